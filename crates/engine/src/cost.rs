use crate::candidates::Candidate;
use crate::scale::EstimatedScale;
use crate::taxonomy::{self, Category};
use renoscope_reference::MobilizationTier;
use serde::Serialize;
use std::collections::BTreeMap;

/// One priced repair candidate. Transient: produced fresh per computation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CostItem {
    pub code: String,

    pub display_name: String,

    /// Base category from the taxonomy; the risk adjuster may promote it
    pub category: Category,

    pub quantity: f64,

    pub material_cost: f64,
    pub labor_cost: f64,
    pub mobilization_cost: f64,
    pub disposal_cost: f64,

    /// Always the sum of the four components
    pub subtotal: f64,

    /// Short-order penalty applied to every component (1.0 when none)
    pub penalty_applied: f64,

    #[serde(skip)]
    pub mobilization_tier: MobilizationTier,
}

impl CostItem {
    fn recompute_subtotal(&mut self) {
        self.subtotal =
            self.material_cost + self.labor_cost + self.mobilization_cost + self.disposal_cost;
    }
}

/// Price every candidate and run the trade mobilization dedup pass.
/// A malformed price definition aborts that item only: logged, skipped,
/// and the rest of the list proceeds.
pub fn price_candidates(candidates: &[Candidate], scale: &EstimatedScale) -> Vec<CostItem> {
    let mut items = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match price_one(candidate, scale) {
            Ok(item) => items.push(item),
            Err(reason) => log::warn!("skipping {}: {reason}", candidate.code),
        }
    }
    dedupe_trade_mobilization(&mut items, scale.base_mobilization);
    items
}

fn price_one(candidate: &Candidate, scale: &EstimatedScale) -> Result<CostItem, String> {
    let def = &candidate.definition;

    if def.material_low < 0.0 || def.material_high < def.material_low {
        return Err("malformed material cost range".to_string());
    }
    if def.labor_hours_per_unit < 0.0 || def.labor_rate <= 0.0 {
        return Err("malformed labor inputs".to_string());
    }

    let quantity = taxonomy::quantity(&candidate.code, def.unit, scale);
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(format!("derived non-positive quantity {quantity}"));
    }

    let material =
        (def.material_low + def.material_high) / 2.0 * scale.material_multiplier * quantity;
    let labor = def.labor_hours_per_unit * (def.labor_rate * scale.labor_multiplier) * quantity;
    let mobilization = match def.mobilization_tier {
        MobilizationTier::Primary => def.mobilization_fee * scale.labor_multiplier,
        MobilizationTier::Secondary => scale.base_mobilization + 0.5 * def.mobilization_fee,
    };
    let disposal = quantity * def.waste_tons_per_unit * (scale.disposal_tax_rate * 100.0);

    // The penalty hits every component, not just the subtotal, so
    // downstream per-component math stays consistent.
    let penalty = if quantity < def.min_project_size {
        def.short_order_penalty
    } else {
        1.0
    };

    let mut item = CostItem {
        code: candidate.code.clone(),
        display_name: def.display_name.clone(),
        category: taxonomy::base_category(&candidate.code),
        quantity,
        material_cost: material * penalty,
        labor_cost: labor * penalty,
        mobilization_cost: mobilization * penalty,
        disposal_cost: disposal * penalty,
        subtotal: 0.0,
        penalty_applied: penalty,
        mobilization_tier: def.mobilization_tier,
    };
    item.recompute_subtotal();
    Ok(item)
}

/// A contractor mobilizing for one trade is charged the base dispatch fee
/// once: within each trade group, every item except the anchor loses the
/// metro base fee from its mobilization component, floored at zero.
fn dedupe_trade_mobilization(items: &mut [CostItem], base_fee: f64) {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, item) in items.iter().enumerate() {
        groups
            .entry(taxonomy::trade(&item.code).to_string())
            .or_default()
            .push(idx);
    }

    for (trade, indices) in groups {
        if indices.len() < 2 {
            continue;
        }

        let anchor = indices
            .iter()
            .copied()
            .reduce(|best, candidate| {
                if is_better_anchor(&items[candidate], &items[best]) {
                    candidate
                } else {
                    best
                }
            })
            .expect("non-empty trade group");

        for idx in indices {
            if idx == anchor {
                continue;
            }
            let item = &mut items[idx];
            item.mobilization_cost = (item.mobilization_cost - base_fee).max(0.0);
            item.recompute_subtotal();
            log::debug!(
                "mobilization dedup: {} rides on the {trade} anchor",
                item.code
            );
        }
    }
}

/// Anchor preference: primary tier first, then highest mobilization value,
/// then lowest item code for a deterministic result.
fn is_better_anchor(a: &CostItem, b: &CostItem) -> bool {
    let a_primary = a.mobilization_tier == MobilizationTier::Primary;
    let b_primary = b.mobilization_tier == MobilizationTier::Primary;
    if a_primary != b_primary {
        return a_primary;
    }
    if a.mobilization_cost != b.mobilization_cost {
        return a.mobilization_cost > b.mobilization_cost;
    }
    a.code < b.code
}

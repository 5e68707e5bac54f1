use crate::context::{Relationship, UserContext};
use crate::risk::RiskAdjustedItem;
use crate::taxonomy::Category;
use renoscope_reference::ReferenceStore;
use serde::{Deserialize, Serialize};

/// The three fixed repair scopes. Closed set: behavior is data-driven per
/// variant, not polymorphic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    SafetyFlip,
    StandardLiving,
    ForeverHome,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::SafetyFlip, Self::StandardLiving, Self::ForeverHome];

    pub const fn id(self) -> &'static str {
        match self {
            Self::SafetyFlip => "SAFETY_FLIP",
            Self::StandardLiving => "STANDARD_LIVING",
            Self::ForeverHome => "FOREVER_HOME",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SafetyFlip => "Safety-Only",
            Self::StandardLiving => "Standard-Living",
            Self::ForeverHome => "Forever-Home",
        }
    }

    /// Item codes this scope refuses to carry at all
    const fn excluded_codes(self) -> &'static [&'static str] {
        match self {
            Self::SafetyFlip => &[
                "ROOFING_METAL_UPGRADE",
                "EXTERIOR_DECK_REBUILD",
                "INTERIOR_KITCHEN_CABINETS",
            ],
            Self::StandardLiving => &["ROOFING_METAL_UPGRADE"],
            Self::ForeverHome => &[],
        }
    }

    fn bucket(self, category: Category) -> Bucket {
        match self {
            Self::SafetyFlip => match category {
                Category::Safety => Bucket::MustDo,
                _ => Bucket::SkipForNow,
            },
            Self::StandardLiving => match category {
                Category::Safety | Category::Structural | Category::Mechanical => Bucket::MustDo,
                Category::Cosmetic => Bucket::ShouldDo,
            },
            Self::ForeverHome => match category {
                Category::Safety | Category::Structural => Bucket::MustDo,
                _ => Bucket::ShouldDo,
            },
        }
    }
}

enum Bucket {
    MustDo,
    ShouldDo,
    SkipForNow,
}

/// Whether one strategy has the reference-data coverage to run at all
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyEligibility {
    pub strategy: Strategy,
    pub eligible: bool,
    pub missing: Vec<String>,
    pub explanation: String,
}

/// Evaluate all three strategies before any strategy-specific costing, so a
/// data hole surfaces as ineligibility instead of a $0 "approved" result.
pub fn evaluate_eligibility(store: &ReferenceStore, ctx: &UserContext) -> Vec<StrategyEligibility> {
    Strategy::ALL
        .iter()
        .map(|&strategy| evaluate_one(strategy, store, ctx))
        .collect()
}

fn evaluate_one(strategy: Strategy, store: &ReferenceStore, ctx: &UserContext) -> StrategyEligibility {
    let mut missing = Vec::new();

    if store.metro(&ctx.metro_code).is_none() {
        missing.push(format!("no metro record for {}", ctx.metro_code));
    }

    match strategy {
        Strategy::SafetyFlip => {
            let has_hazards = store
                .era(&ctx.era_code)
                .is_some_and(|era| !era.hazards.is_empty());
            if !has_hazards {
                missing.push(format!("no hazard catalog for era {}", ctx.era_code));
            }
        }
        Strategy::StandardLiving | Strategy::ForeverHome => {
            if store.item_count() == 0 {
                missing.push("price library is empty".to_string());
            }
        }
    }

    let eligible = missing.is_empty();
    let explanation = if eligible {
        format!("{} has full reference coverage", strategy.display_name())
    } else {
        format!("{} skipped: {}", strategy.display_name(), missing.join("; "))
    };

    if !eligible {
        log::debug!("{explanation}");
    }

    StrategyEligibility {
        strategy,
        eligible,
        missing,
        explanation,
    }
}

/// Selection policy: a buyer takes the pre-closing safety scope when it can
/// run; otherwise Standard-Living when it can; otherwise any eligible
/// strategy; otherwise none (the caller issues INSUFFICIENT_DATA).
pub fn choose_strategy(
    relationship: Relationship,
    evaluations: &[StrategyEligibility],
) -> Option<Strategy> {
    let eligible =
        |strategy| evaluations.iter().any(|e| e.strategy == strategy && e.eligible);

    if relationship == Relationship::Buying && eligible(Strategy::SafetyFlip) {
        return Some(Strategy::SafetyFlip);
    }
    if eligible(Strategy::StandardLiving) {
        return Some(Strategy::StandardLiving);
    }
    Strategy::ALL.into_iter().find(|&s| eligible(s))
}

/// The partitioned plan for one strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepairPlan {
    pub strategy: Strategy,

    /// Highest-leverage items first
    pub must_do: Vec<RiskAdjustedItem>,
    pub should_do: Vec<RiskAdjustedItem>,
    pub skip_for_now: Vec<RiskAdjustedItem>,

    pub must_do_total: f64,
    pub should_do_total: f64,

    /// Human-readable record of history-based exclusions
    pub exclusions: Vec<String>,
}

/// Partition risk-adjusted items into the strategy's buckets, dropping its
/// excluded codes first. Buckets sort by adjusted cost descending with the
/// item code as tie-break.
pub fn build_plan(
    strategy: Strategy,
    items: &[RiskAdjustedItem],
    exclusions: &[String],
) -> RepairPlan {
    let mut must_do = Vec::new();
    let mut should_do = Vec::new();
    let mut skip_for_now = Vec::new();

    for item in items {
        if strategy.excluded_codes().contains(&item.code.as_str()) {
            continue;
        }
        match strategy.bucket(item.category) {
            Bucket::MustDo => must_do.push(item.clone()),
            Bucket::ShouldDo => should_do.push(item.clone()),
            Bucket::SkipForNow => skip_for_now.push(item.clone()),
        }
    }

    for bucket in [&mut must_do, &mut should_do, &mut skip_for_now] {
        bucket.sort_by(|a, b| {
            b.adjusted_cost
                .total_cmp(&a.adjusted_cost)
                .then_with(|| a.code.cmp(&b.code))
        });
    }

    let must_do_total = must_do.iter().map(|i| i.adjusted_cost).sum();
    let should_do_total = should_do.iter().map(|i| i.adjusted_cost).sum();

    RepairPlan {
        strategy,
        must_do,
        should_do,
        skip_for_now,
        must_do_total,
        should_do_total,
        exclusions: exclusions.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(code: &str, category: Category, cost: f64) -> RiskAdjustedItem {
        RiskAdjustedItem {
            code: code.to_string(),
            display_name: code.to_string(),
            category,
            adjusted_cost: cost,
            risk_flags: Vec::new(),
            mandatory: category == Category::Safety,
            explanation: String::new(),
            compounding_badge: None,
        }
    }

    fn sample_items() -> Vec<RiskAdjustedItem> {
        vec![
            item("PLUMBING_SUPPLY_REPIPE", Category::Safety, 5000.0),
            item("ROOFING_ASPHALT_SHINGLE", Category::Structural, 9000.0),
            item("HVAC_SYSTEM_REPLACE", Category::Mechanical, 4500.0),
            item("INTERIOR_PAINT_FULL", Category::Cosmetic, 1200.0),
            item("ROOFING_METAL_UPGRADE", Category::Structural, 19000.0),
        ]
    }

    #[test]
    fn safety_flip_takes_only_safety_items() {
        let plan = build_plan(Strategy::SafetyFlip, &sample_items(), &[]);
        let must: Vec<&str> = plan.must_do.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(must, vec!["PLUMBING_SUPPLY_REPIPE"]);
        // Everything else is skipped, nothing is "should do" for a flip
        assert!(plan.should_do.is_empty());
        assert_eq!(plan.skip_for_now.len(), 3);
        // Excluded metal upgrade appears nowhere
        assert!(!plan
            .skip_for_now
            .iter()
            .any(|i| i.code == "ROOFING_METAL_UPGRADE"));
    }

    #[test]
    fn standard_living_pulls_structural_and_mechanical_forward() {
        let plan = build_plan(Strategy::StandardLiving, &sample_items(), &[]);
        let must: Vec<&str> = plan.must_do.iter().map(|i| i.code.as_str()).collect();
        // Sorted by cost descending
        assert_eq!(
            must,
            vec![
                "ROOFING_ASPHALT_SHINGLE",
                "PLUMBING_SUPPLY_REPIPE",
                "HVAC_SYSTEM_REPLACE"
            ]
        );
        assert_eq!(plan.should_do.len(), 1);
        assert!((plan.must_do_total - 18_500.0).abs() < 1e-9);
    }

    #[test]
    fn forever_home_defers_mechanicals_but_keeps_the_metal_roof() {
        let plan = build_plan(Strategy::ForeverHome, &sample_items(), &[]);
        let must: Vec<&str> = plan.must_do.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(
            must,
            vec![
                "ROOFING_METAL_UPGRADE",
                "ROOFING_ASPHALT_SHINGLE",
                "PLUMBING_SUPPLY_REPIPE"
            ]
        );
        let should: Vec<&str> = plan.should_do.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(should, vec!["HVAC_SYSTEM_REPLACE", "INTERIOR_PAINT_FULL"]);
    }

    #[test]
    fn equal_costs_tie_break_on_item_code() {
        let items = vec![
            item("B_ITEM", Category::Safety, 1000.0),
            item("A_ITEM", Category::Safety, 1000.0),
        ];
        let plan = build_plan(Strategy::SafetyFlip, &items, &[]);
        let must: Vec<&str> = plan.must_do.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(must, vec!["A_ITEM", "B_ITEM"]);
    }

    #[test]
    fn buying_prefers_safety_flip() {
        let store = renoscope_reference::ReferenceStore::builtin();
        let ctx = UserContext::new(
            10_000.0,
            "AUSTIN_ROUND_ROCK_TX",
            "1980_1995",
            Relationship::Buying,
        );
        let evals = evaluate_eligibility(store, &ctx);
        assert!(evals.iter().all(|e| e.eligible));
        assert_eq!(
            choose_strategy(Relationship::Buying, &evals),
            Some(Strategy::SafetyFlip)
        );
        assert_eq!(
            choose_strategy(Relationship::Living, &evals),
            Some(Strategy::StandardLiving)
        );
        assert_eq!(
            choose_strategy(Relationship::Investing, &evals),
            Some(Strategy::StandardLiving)
        );
    }

    #[test]
    fn unknown_era_blocks_only_safety_flip() {
        let store = renoscope_reference::ReferenceStore::builtin();
        let ctx = UserContext::new(
            10_000.0,
            "AUSTIN_ROUND_ROCK_TX",
            "1875_1900",
            Relationship::Buying,
        );
        let evals = evaluate_eligibility(store, &ctx);

        let flip = evals
            .iter()
            .find(|e| e.strategy == Strategy::SafetyFlip)
            .unwrap();
        assert!(!flip.eligible);
        assert_eq!(flip.missing, vec!["no hazard catalog for era 1875_1900"]);

        // Buyer falls through to Standard-Living
        assert_eq!(
            choose_strategy(Relationship::Buying, &evals),
            Some(Strategy::StandardLiving)
        );
    }

    #[test]
    fn empty_store_leaves_nothing_eligible() {
        let store = renoscope_reference::ReferenceStore::from_parts(
            Default::default(),
            Default::default(),
            Default::default(),
        );
        let ctx = UserContext::new(10_000.0, "M", "E", Relationship::Buying);
        let evals = evaluate_eligibility(&store, &ctx);
        assert!(evals.iter().all(|e| !e.eligible));
        assert_eq!(choose_strategy(Relationship::Buying, &evals), None);
    }
}

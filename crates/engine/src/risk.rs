use crate::context::{Relationship, UserContext};
use crate::cost::CostItem;
use crate::taxonomy::{self, Category};
use renoscope_reference::{EraRecord, RemovalCostTier, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed specialist-inspection fee added when a hazard mandates one
pub const INSPECTION_FEE: f64 = 650.0;

/// Fixed abatement adder for hazards with a high removal-cost tier
pub const HIGH_REMOVAL_FEE: f64 = 2800.0;

/// Flat compounding factor for top-severity era hazards
const CRITICAL_COMPOUND: f64 = 1.3;

const FORENSIC_BADGE: &str = "Confirmed on site";
const COMPOUNDING_BADGE: &str = "Critical-era compounding";

/// Risk-flag tokens attached to an adjusted item, in application order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    ForensicConfirmed,
    EraRisk,
    SafetyOverride,
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            RiskFlag::ForensicConfirmed => "FORENSIC_CONFIRMED",
            RiskFlag::EraRisk => "ERA_RISK",
            RiskFlag::SafetyOverride => "SAFETY_OVERRIDE",
        };
        f.write_str(token)
    }
}

/// A cost item after forensic, era, category and history adjustment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAdjustedItem {
    pub code: String,

    pub display_name: String,

    pub category: Category,

    pub adjusted_cost: f64,

    /// Flags in the order they were applied
    pub risk_flags: Vec<RiskFlag>,

    pub mandatory: bool,

    pub explanation: String,

    pub compounding_badge: Option<String>,
}

/// Output of the risk pass: surviving items plus the human-readable record
/// of everything history excluded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAdjustment {
    pub items: Vec<RiskAdjustedItem>,
    pub exclusions: Vec<String>,
}

/// Adjust every priced item for the user's situation. Order is fixed:
/// forensic overrides, then the era hazard overlay, then categorization,
/// then history-based exclusion.
pub fn adjust(items: Vec<CostItem>, ctx: &UserContext, era: Option<&EraRecord>) -> RiskAdjustment {
    let forensic = taxonomy::forensic_rules(&ctx.forensic);
    let mut adjusted = Vec::with_capacity(items.len());
    let mut exclusions = Vec::new();

    for item in items {
        let mut cost = item.subtotal;
        let mut flags: Vec<RiskFlag> = Vec::new();
        let mut mandatory = false;
        let mut notes: Vec<String> = Vec::new();
        let mut badge: Option<String> = None;

        // 1. Forensic overrides: observed evidence beats every other signal.
        let observed = forensic.iter().find(|rule| rule.item_code == item.code);
        if let Some(rule) = observed {
            cost *= rule.multiplier;
            mandatory = true;
            flags.push(RiskFlag::ForensicConfirmed);
            badge = Some(FORENSIC_BADGE.to_string());
            notes.push(format!(
                "Observed {} confirmed on site; statistical discounts do not apply.",
                rule.hazard
            ));
        }

        // 2. Era hazard overlay.
        if let Some(era) = era {
            for hazard in &era.hazards {
                if !taxonomy::hazard_applies(&hazard.code, &item.code) {
                    continue;
                }
                flags.push(RiskFlag::EraRisk);
                notes.push(format!("{} {}", hazard.definition, hazard.damage));

                if let Some(multiplier) = hazard.remedy_multiplier {
                    // Risk premiums ride on labor, not materials: scale the
                    // labor share of the subtotal and add the delta.
                    cost += item.labor_cost * (multiplier - 1.0);
                }
                if hazard.severity == Severity::Critical {
                    cost *= CRITICAL_COMPOUND;
                    badge = Some(COMPOUNDING_BADGE.to_string());
                    mandatory = true;
                }
                if hazard.inspection_mandatory {
                    cost += INSPECTION_FEE;
                    mandatory = true;
                }
                if hazard.removal_cost == RemovalCostTier::High {
                    cost += HIGH_REMOVAL_FEE;
                }
            }
        }

        // 3. Categorization: mandatory promotes to SAFETY.
        let category = if mandatory {
            Category::Safety
        } else {
            item.category
        };

        // 4. History-based exclusion, LIVING only: buyers and investors see
        // the full risk scope since they lack lived experience of the house.
        if ctx.relationship == Relationship::Living {
            if let Some(system) = taxonomy::core_system_of(&item.code) {
                if ctx.core_system_history.contains(&system) {
                    if let Some(rule) = observed {
                        flags.push(RiskFlag::SafetyOverride);
                        notes.push(format!(
                            "Claimed {} update is overridden by observed {}.",
                            system.display_name(),
                            rule.hazard
                        ));
                    } else {
                        let note = format!(
                            "Recent Major System Update: {} (user-confirmed)",
                            system.display_name()
                        );
                        log::info!("excluding {}: {note}", item.code);
                        if !exclusions.contains(&note) {
                            exclusions.push(note);
                        }
                        continue;
                    }
                }
            }

            if category == Category::Cosmetic && !mandatory && flags.is_empty() {
                if let Some(space) = taxonomy::living_space_of(&item.code) {
                    if ctx.living_space_history.contains(&space) {
                        let note = format!(
                            "Recent Remodel: {} (user-confirmed)",
                            space.display_name()
                        );
                        log::info!("excluding {}: {note}", item.code);
                        exclusions.push(note);
                        continue;
                    }
                }
            }
        }

        adjusted.push(RiskAdjustedItem {
            code: item.code,
            display_name: item.display_name,
            category,
            adjusted_cost: cost,
            risk_flags: flags,
            mandatory,
            explanation: notes.join(" "),
            compounding_badge: badge,
        });
    }

    RiskAdjustment {
        items: adjusted,
        exclusions,
    }
}

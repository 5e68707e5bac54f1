use crate::context::UserContext;
use crate::strategy::{RepairPlan, Strategy, StrategyEligibility};
use crate::taxonomy::Category;
use renoscope_reference::{EraRecord, MetroRecord};
use serde::{Deserialize, Serialize};

/// Budget-adequacy classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictTier {
    LowRisk,
    Conditional,
    HighFinancialRisk,
    InsufficientData,
}

/// Budgets within this fraction of the floor are negotiable, not fatal
const CONDITIONAL_MARGIN: f64 = 0.9;

/// Cost-plus-hassle multiplier applied to safety items for negotiation copy
const LEVERAGE_MULTIPLIER: f64 = 1.5;

const DEAL_KILLER_MESSAGE: &str = "An observed defect class (defective drywall, \
Federal Pacific panel, or polybutylene piping) routinely blocks financing and \
insurance regardless of repair budget. Price the exit before pricing the repair.";

/// A strategy the engine could not run, with the data it was missing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedStrategy {
    pub strategy: Strategy,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeverageItem {
    pub display_name: String,
    pub cost: f64,
}

/// Copy-ready negotiation ammunition derived from the must-do safety items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NegotiationLeverage {
    /// 1.5x the safety-item total: what the work costs a seller who also
    /// has to find, schedule and warranty it
    pub amount: f64,

    pub items: Vec<LeverageItem>,

    pub script: String,
}

/// Situational context rendered alongside the numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextBriefing {
    pub regional_risk: String,
    pub foundation_type: String,
    pub labor_market: String,
    pub era_hint: Option<String>,
}

impl ContextBriefing {
    pub fn new(metro: &MetroRecord, era: Option<&EraRecord>) -> Self {
        Self {
            regional_risk: metro.regional_risk.clone(),
            foundation_type: metro.foundation_type.clone(),
            labor_market: metro.labor_market.clone(),
            era_hint: era.map(|e| e.feature_hint.clone()),
        }
    }
}

/// The engine's final answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub tier: VerdictTier,

    pub headline: String,

    /// Absent only for INSUFFICIENT_DATA
    pub strategy: Option<Strategy>,

    pub strategy_rationale: String,

    pub skipped_strategies: Vec<SkippedStrategy>,

    pub plan: Option<RepairPlan>,

    /// The safety floor the budget is measured against
    pub minimum_required: f64,

    pub deal_killer: bool,
    pub deal_killer_message: Option<String>,

    pub leverage: Option<NegotiationLeverage>,

    pub briefing: ContextBriefing,
}

/// Assemble the final verdict for a chosen, eligible strategy.
/// `minimum_required` is the SAFETY_FLIP shadow total, or the chosen
/// strategy's own total when SAFETY_FLIP could not run.
pub fn assemble(
    ctx: &UserContext,
    chosen: Strategy,
    plan: RepairPlan,
    minimum_required: f64,
    evaluations: &[StrategyEligibility],
    briefing: ContextBriefing,
) -> Verdict {
    if minimum_required <= 0.0 {
        // An eligible strategy priced the safety floor at zero. That is a
        // data defect, not a green light.
        log::error!(
            "zero minimum-required cost for eligible strategy {} (metro {}, era {})",
            chosen.id(),
            ctx.metro_code,
            ctx.era_code
        );
        return insufficient_data(
            ctx,
            evaluations,
            briefing,
            "Reference data produced a zero-cost safety floor; refusing to issue an \
             optimistic verdict from inconsistent data.",
        );
    }

    let tier = if ctx.budget >= minimum_required {
        VerdictTier::LowRisk
    } else if ctx.budget >= CONDITIONAL_MARGIN * minimum_required {
        VerdictTier::Conditional
    } else {
        VerdictTier::HighFinancialRisk
    };

    let headline = match tier {
        VerdictTier::LowRisk => format!(
            "Budget covers the ${:.0} an inspection would put on the table",
            minimum_required
        ),
        VerdictTier::Conditional => format!(
            "Budget lands within 10% of the ${:.0} floor; negotiate the gap",
            minimum_required
        ),
        VerdictTier::HighFinancialRisk => format!(
            "Budget falls materially short of the ${:.0} safety floor",
            minimum_required
        ),
        VerdictTier::InsufficientData => unreachable!("handled above"),
    };

    let deal_killer = ctx.forensic.any_deal_killer();
    let leverage = build_leverage(&plan);

    Verdict {
        tier,
        headline,
        strategy: Some(chosen),
        strategy_rationale: rationale(chosen),
        skipped_strategies: skipped(evaluations),
        plan: Some(plan),
        minimum_required,
        deal_killer,
        deal_killer_message: deal_killer.then(|| DEAL_KILLER_MESSAGE.to_string()),
        leverage,
        briefing,
    }
}

/// The first-class "we don't know" verdict. Never defaults to approved.
pub fn insufficient_data(
    ctx: &UserContext,
    evaluations: &[StrategyEligibility],
    briefing: ContextBriefing,
    rationale: &str,
) -> Verdict {
    let deal_killer = ctx.forensic.any_deal_killer();
    Verdict {
        tier: VerdictTier::InsufficientData,
        headline: "Not enough reference data to price this property; no verdict issued"
            .to_string(),
        strategy: None,
        strategy_rationale: rationale.to_string(),
        skipped_strategies: skipped(evaluations),
        plan: None,
        minimum_required: 0.0,
        deal_killer,
        deal_killer_message: deal_killer.then(|| DEAL_KILLER_MESSAGE.to_string()),
        leverage: None,
        briefing,
    }
}

fn rationale(chosen: Strategy) -> String {
    match chosen {
        Strategy::SafetyFlip => {
            "Buyer pre-closing scope: only the items a safety inspection would force."
        }
        Strategy::StandardLiving => {
            "Occupant scope: safety, structural and mechanical exposure priced for daily living."
        }
        Strategy::ForeverHome => {
            "Long-hold scope: structure first, mechanicals budgeted as they fail."
        }
    }
    .to_string()
}

fn skipped(evaluations: &[StrategyEligibility]) -> Vec<SkippedStrategy> {
    evaluations
        .iter()
        .filter(|e| !e.eligible)
        .map(|e| SkippedStrategy {
            strategy: e.strategy,
            reasons: e.missing.clone(),
        })
        .collect()
}

fn build_leverage(plan: &RepairPlan) -> Option<NegotiationLeverage> {
    let leveraged: Vec<LeverageItem> = plan
        .must_do
        .iter()
        .filter(|i| i.category == Category::Safety || i.mandatory)
        .map(|i| LeverageItem {
            display_name: i.display_name.clone(),
            cost: i.adjusted_cost,
        })
        .collect();

    if leveraged.is_empty() {
        return None;
    }

    let base: f64 = leveraged.iter().map(|i| i.cost).sum();
    let amount = LEVERAGE_MULTIPLIER * base;

    let mut script = format!(
        "Ask for ${amount:.0} off: an inspector will flag {} safety item(s) the \
         seller would otherwise have to scope, schedule and warranty.",
        leveraged.len()
    );
    for item in &leveraged {
        script.push_str(&format!(" {} (${:.0}).", item.display_name, item.cost));
    }

    Some(NegotiationLeverage {
        amount,
        items: leveraged,
        script,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ForensicFlags, Relationship};
    use crate::risk::RiskAdjustedItem;
    use crate::strategy::build_plan;

    fn briefing() -> ContextBriefing {
        ContextBriefing {
            regional_risk: "risk".to_string(),
            foundation_type: "slab".to_string(),
            labor_market: "tight".to_string(),
            era_hint: None,
        }
    }

    fn safety_item(code: &str, cost: f64) -> RiskAdjustedItem {
        RiskAdjustedItem {
            code: code.to_string(),
            display_name: code.to_string(),
            category: Category::Safety,
            adjusted_cost: cost,
            risk_flags: Vec::new(),
            mandatory: true,
            explanation: String::new(),
            compounding_badge: None,
        }
    }

    fn ctx(budget: f64) -> UserContext {
        UserContext::new(budget, "M", "1980_1995", Relationship::Buying)
    }

    fn plan(cost: f64) -> RepairPlan {
        build_plan(Strategy::SafetyFlip, &[safety_item("ITEM_A", cost)], &[])
    }

    #[test]
    fn tier_boundaries() {
        let verdict = assemble(&ctx(10_000.0), Strategy::SafetyFlip, plan(10_000.0), 10_000.0, &[], briefing());
        assert_eq!(verdict.tier, VerdictTier::LowRisk);

        let verdict = assemble(&ctx(9_000.0), Strategy::SafetyFlip, plan(10_000.0), 10_000.0, &[], briefing());
        assert_eq!(verdict.tier, VerdictTier::Conditional);

        let verdict = assemble(&ctx(8_999.0), Strategy::SafetyFlip, plan(10_000.0), 10_000.0, &[], briefing());
        assert_eq!(verdict.tier, VerdictTier::HighFinancialRisk);
    }

    #[test]
    fn zero_floor_degrades_to_insufficient_data() {
        let empty = build_plan(Strategy::SafetyFlip, &[], &[]);
        let verdict = assemble(&ctx(10_000.0), Strategy::SafetyFlip, empty, 0.0, &[], briefing());
        assert_eq!(verdict.tier, VerdictTier::InsufficientData);
        assert!(verdict.plan.is_none());
        assert_eq!(verdict.minimum_required, 0.0);
    }

    #[test]
    fn deal_killer_is_independent_of_tier() {
        let mut rich = ctx(1_000_000.0);
        rich.forensic = ForensicFlags {
            chinese_drywall: true,
            ..Default::default()
        };
        let verdict = assemble(&rich, Strategy::SafetyFlip, plan(5_000.0), 5_000.0, &[], briefing());
        assert_eq!(verdict.tier, VerdictTier::LowRisk);
        assert!(verdict.deal_killer);
        assert!(verdict.deal_killer_message.is_some());
    }

    #[test]
    fn leverage_is_one_and_a_half_times_safety_cost() {
        let plan = build_plan(
            Strategy::SafetyFlip,
            &[safety_item("ITEM_A", 4_000.0), safety_item("ITEM_B", 2_000.0)],
            &[],
        );
        let verdict = assemble(&ctx(20_000.0), Strategy::SafetyFlip, plan, 6_000.0, &[], briefing());
        let leverage = verdict.leverage.unwrap();
        assert!((leverage.amount - 9_000.0).abs() < 1e-9);
        assert_eq!(leverage.items.len(), 2);
        assert!(leverage.script.contains("ITEM_A"));
        assert!(leverage.script.contains("$4000"));
    }

    #[test]
    fn insufficient_data_headline_names_the_problem() {
        let verdict = insufficient_data(&ctx(10_000.0), &[], briefing(), "nothing eligible");
        assert_eq!(verdict.tier, VerdictTier::InsufficientData);
        assert!(verdict.headline.contains("Not enough reference data"));
        assert!(verdict.strategy.is_none());
        assert!(verdict.leverage.is_none());
    }
}

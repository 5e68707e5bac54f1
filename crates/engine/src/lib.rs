mod candidates;
mod context;
mod cost;
mod error;
mod risk;
mod scale;
mod strategy;
mod taxonomy;
mod verdict;

pub use candidates::{generate_candidates, Candidate};
pub use context::{CoreSystem, ForensicFlags, LivingSpace, Relationship, UserContext};
pub use cost::{price_candidates, CostItem};
pub use error::{EngineError, Result};
pub use risk::{adjust as adjust_risk, RiskAdjustedItem, RiskAdjustment, RiskFlag};
pub use scale::{EstimatedScale, DEFAULT_HOUSE_SQFT};
pub use strategy::{
    build_plan, choose_strategy, evaluate_eligibility, RepairPlan, Strategy, StrategyEligibility,
};
pub use taxonomy::Category;
pub use verdict::{
    ContextBriefing, LeverageItem, NegotiationLeverage, SkippedStrategy, Verdict, VerdictTier,
};

use renoscope_reference::ReferenceStore;
use std::sync::Arc;

/// The verdict computation engine. Holds the read-only reference tables;
/// each call is a pure function of (UserContext, reference data), so one
/// engine serves any number of threads.
#[derive(Debug, Clone)]
pub struct VerdictEngine {
    store: Arc<ReferenceStore>,
}

impl VerdictEngine {
    pub fn new(store: Arc<ReferenceStore>) -> Self {
        Self { store }
    }

    /// Engine over the embedded default dataset
    pub fn with_builtin() -> Self {
        Self::new(Arc::new(ReferenceStore::builtin().clone()))
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    /// Compute a verdict for one property profile.
    ///
    /// Fails fast on an unknown metro code or invalid budget. Missing era
    /// or library coverage is not an error: it degrades to an
    /// INSUFFICIENT_DATA verdict.
    pub fn generate_verdict(&self, ctx: &UserContext) -> Result<Verdict> {
        if !ctx.budget.is_finite() || ctx.budget < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "budget must be a non-negative amount, got {}",
                ctx.budget
            )));
        }
        let metro = self
            .store
            .metro(&ctx.metro_code)
            .ok_or_else(|| EngineError::UnknownMetro(ctx.metro_code.clone()))?;
        let era = self.store.era(&ctx.era_code);

        log::debug!(
            "verdict request: metro={} era={} budget={:.0} relationship={:?}",
            ctx.metro_code,
            ctx.era_code,
            ctx.budget,
            ctx.relationship
        );

        let evaluations = evaluate_eligibility(&self.store, ctx);
        let briefing = ContextBriefing::new(metro, era);

        let Some(chosen) = choose_strategy(ctx.relationship, &evaluations) else {
            log::info!(
                "no eligible strategy for metro={} era={}",
                ctx.metro_code,
                ctx.era_code
            );
            return Ok(verdict::insufficient_data(
                ctx,
                &evaluations,
                briefing,
                "No strategy has the reference-data coverage to run for this property.",
            ));
        };

        let scale = EstimatedScale::derive(ctx, metro);
        let candidates = generate_candidates(self.store.library());
        let priced = price_candidates(&candidates, &scale);
        let adjustment = risk::adjust(priced, ctx, era);
        let plan = build_plan(chosen, &adjustment.items, &adjustment.exclusions);

        // The floor is always the pure safety cost: recompute the
        // SAFETY_FLIP shadow plan even when another strategy is displayed.
        // Only when SAFETY_FLIP itself cannot run does the chosen
        // strategy's own total stand in.
        let safety_flip_eligible = evaluations
            .iter()
            .any(|e| e.strategy == Strategy::SafetyFlip && e.eligible);
        let minimum_required = if !safety_flip_eligible || chosen == Strategy::SafetyFlip {
            plan.must_do_total
        } else {
            build_plan(Strategy::SafetyFlip, &adjustment.items, &[]).must_do_total
        };

        Ok(verdict::assemble(
            ctx,
            chosen,
            plan,
            minimum_required,
            &evaluations,
            briefing,
        ))
    }
}

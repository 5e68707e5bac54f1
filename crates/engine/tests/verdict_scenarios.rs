//! End-to-end scenarios against the embedded dataset.

use pretty_assertions::assert_eq;
use renoscope_engine::{
    CoreSystem, EngineError, ForensicFlags, Relationship, RiskFlag, Strategy, UserContext,
    VerdictEngine, VerdictTier,
};

fn engine() -> VerdictEngine {
    VerdictEngine::with_builtin()
}

fn austin_living() -> UserContext {
    let mut ctx = UserContext::new(
        10_000.0,
        "AUSTIN_ROUND_ROCK_TX",
        "1980_1995",
        Relationship::Living,
    );
    ctx.core_system_history = vec![CoreSystem::Roofing];
    ctx
}

#[test]
fn austin_scenario_prices_the_polybutylene_era() {
    let verdict = engine().generate_verdict(&austin_living()).unwrap();

    assert_ne!(verdict.tier, VerdictTier::InsufficientData);
    assert_eq!(verdict.strategy, Some(Strategy::StandardLiving));

    let plan = verdict.plan.as_ref().unwrap();

    // The user already replaced the roof; it must not be billed again.
    assert!(
        !plan.must_do.iter().any(|i| i.code.starts_with("ROOFING")),
        "roofing must be absent from must-do"
    );
    assert!(plan
        .exclusions
        .iter()
        .any(|note| note == "Recent Major System Update: Roofing (user-confirmed)"));

    // The era's polybutylene hazard lands on the re-pipe as an era risk.
    let repipe = plan
        .must_do
        .iter()
        .find(|i| i.code == "PLUMBING_SUPPLY_REPIPE")
        .expect("re-pipe in must-do");
    assert!(repipe.risk_flags.contains(&RiskFlag::EraRisk));
    assert!(repipe.mandatory);

    assert!(
        plan.must_do_total > 1_000.0 && plan.must_do_total < 20_000.0,
        "must-do total {} outside expected band",
        plan.must_do_total
    );

    // The safety floor sits under the stated budget here.
    assert!(verdict.minimum_required > 0.0);
    assert!(verdict.minimum_required < 10_000.0);
    assert_eq!(verdict.tier, VerdictTier::LowRisk);
}

#[test]
fn chinese_drywall_is_a_deal_killer_at_any_budget() {
    let engine = engine();
    for budget in [0.0, 5_000.0, 1_000_000.0] {
        let mut ctx = UserContext::new(
            budget,
            "TAMPA_ST_PETE_FL",
            "1995_2010",
            Relationship::Buying,
        );
        ctx.forensic = ForensicFlags {
            chinese_drywall: true,
            ..Default::default()
        };

        let verdict = engine.generate_verdict(&ctx).unwrap();
        assert!(verdict.deal_killer, "budget {budget} must not clear the flag");
        assert!(verdict.deal_killer_message.is_some());
    }
}

#[test]
fn forensic_evidence_overrides_claimed_plumbing_update() {
    let mut ctx = austin_living();
    ctx.core_system_history = vec![CoreSystem::Plumbing];
    ctx.forensic = ForensicFlags {
        polybutylene: true,
        ..Default::default()
    };

    let verdict = engine().generate_verdict(&ctx).unwrap();
    let plan = verdict.plan.as_ref().unwrap();

    let repipe = plan
        .must_do
        .iter()
        .find(|i| i.code == "PLUMBING_SUPPLY_REPIPE")
        .expect("observed polybutylene keeps the re-pipe in must-do");
    assert!(repipe.risk_flags.contains(&RiskFlag::SafetyOverride));
    assert!(repipe.risk_flags.contains(&RiskFlag::ForensicConfirmed));

    // The sewer lateral carries no contradicting observation and drops.
    assert!(!plan.must_do.iter().any(|i| i.code == "PLUMBING_SEWER_LATERAL"));
}

#[test]
fn history_claims_are_ignored_for_buyers() {
    let mut ctx = austin_living();
    ctx.relationship = Relationship::Buying;

    let verdict = engine().generate_verdict(&ctx).unwrap();
    let plan = verdict.plan.as_ref().unwrap();

    assert!(plan.exclusions.is_empty(), "buyers get the full risk scope");
    let everywhere: Vec<&str> = plan
        .must_do
        .iter()
        .chain(&plan.should_do)
        .chain(&plan.skip_for_now)
        .map(|i| i.code.as_str())
        .collect();
    assert!(everywhere.contains(&"ROOFING_ASPHALT_SHINGLE"));
}

#[test]
fn identical_input_yields_byte_identical_verdicts() {
    let engine = engine();
    let ctx = austin_living();

    let first = serde_json::to_string(&engine.generate_verdict(&ctx).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.generate_verdict(&ctx).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn safety_scope_never_exceeds_standard_living_scope() {
    let engine = engine();
    let store = engine.store();

    for metro in store.metros().keys() {
        for era in store.eras().keys() {
            let ctx = UserContext::new(50_000.0, metro.clone(), era.clone(), Relationship::Buying);
            let scale_metro = store.metro(metro).unwrap();
            let scale = renoscope_engine::EstimatedScale::derive(&ctx, scale_metro);
            let candidates = renoscope_engine::generate_candidates(store.library());
            let priced = renoscope_engine::price_candidates(&candidates, &scale);
            let adjusted = renoscope_engine::adjust_risk(priced, &ctx, store.era(era));

            let flip = renoscope_engine::build_plan(Strategy::SafetyFlip, &adjusted.items, &[]);
            let living =
                renoscope_engine::build_plan(Strategy::StandardLiving, &adjusted.items, &[]);

            assert!(
                flip.must_do_total <= living.must_do_total + 1e-6,
                "{metro}/{era}: safety {} > standard-living {}",
                flip.must_do_total,
                living.must_do_total
            );
        }
    }
}

#[test]
fn every_builtin_combination_yields_a_positive_floor() {
    let engine = engine();
    let store = engine.store();

    for metro in store.metros().keys() {
        for era in store.eras().keys() {
            let ctx = UserContext::new(50_000.0, metro.clone(), era.clone(), Relationship::Buying);
            let verdict = engine.generate_verdict(&ctx).unwrap();
            assert_ne!(
                verdict.tier,
                VerdictTier::InsufficientData,
                "{metro}/{era} unexpectedly lacks coverage"
            );
            assert!(
                verdict.minimum_required > 0.0,
                "{metro}/{era}: zero floor for an eligible strategy"
            );
        }
    }
}

#[test]
fn unknown_metro_fails_fast() {
    let ctx = UserContext::new(10_000.0, "GOTHAM_NJ", "1980_1995", Relationship::Buying);
    let err = engine().generate_verdict(&ctx).unwrap_err();
    assert!(matches!(err, EngineError::UnknownMetro(code) if code == "GOTHAM_NJ"));
}

#[test]
fn unknown_era_degrades_gracefully_for_buyers() {
    // Buyer wants SAFETY_FLIP, which needs the era catalog. With an unknown
    // era the engine falls through to STANDARD_LIVING, never to a silent $0.
    let ctx = UserContext::new(
        10_000.0,
        "COLUMBUS_OH",
        "1700_1800",
        Relationship::Buying,
    );
    let verdict = engine().generate_verdict(&ctx).unwrap();
    assert_eq!(verdict.strategy, Some(Strategy::StandardLiving));
    assert!(verdict
        .skipped_strategies
        .iter()
        .any(|s| s.strategy == Strategy::SafetyFlip));
    assert!(verdict.minimum_required > 0.0);
}

#[test]
fn negative_budget_is_rejected() {
    let ctx = UserContext::new(
        -5.0,
        "AUSTIN_ROUND_ROCK_TX",
        "1980_1995",
        Relationship::Buying,
    );
    let err = engine().generate_verdict(&ctx).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn buyers_get_negotiation_leverage_from_safety_items() {
    let ctx = UserContext::new(
        50_000.0,
        "AUSTIN_ROUND_ROCK_TX",
        "1980_1995",
        Relationship::Buying,
    );
    let verdict = engine().generate_verdict(&ctx).unwrap();
    let plan = verdict.plan.as_ref().unwrap();
    let leverage = verdict.leverage.expect("safety items present in this era");

    let safety_total: f64 = plan
        .must_do
        .iter()
        .filter(|i| i.mandatory)
        .map(|i| i.adjusted_cost)
        .sum();
    assert!((leverage.amount - 1.5 * safety_total).abs() < 1e-6);
    assert!(!leverage.script.is_empty());
}

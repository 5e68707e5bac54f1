//! Explicit item taxonomy: trade grouping, base categories, quantity rules,
//! and the hazard/forensic/history target tables. One table per concern
//! instead of item-code substring probing, so adding an item means adding a
//! row here rather than auditing string matches across the pipeline.

use crate::context::{CoreSystem, ForensicFlags, LivingSpace};
use crate::scale::EstimatedScale;
use renoscope_reference::MeasureUnit;
use serde::{Deserialize, Serialize};

/// Repair category used by the strategic filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Safety,
    Structural,
    Mechanical,
    Cosmetic,
}

/// How an item's quantity is derived from the estimated scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityRule {
    RoofSquares,
    WallSquares,
    InteriorSqft,
    HouseSqft,
    /// Interior square footage with a whole-house floor quantity
    InteriorSqftFloor(f64),
    PerimeterFeet,
    ExteriorAcres,
    /// Fixed per-house quantity (unit counts and fixed runs)
    Fixed(f64),
}

/// Leading item-code token: the trade that mobilizes for the work
pub fn trade(item_code: &str) -> &str {
    item_code.split('_').next().unwrap_or(item_code)
}

/// Base category before any safety promotion. Sewer work is structural
/// (excavation against the building) even though plumbers perform it.
pub fn base_category(item_code: &str) -> Category {
    match item_code {
        "PLUMBING_SEWER_LATERAL" => Category::Structural,
        _ => match trade(item_code) {
            "ROOFING" | "FOUNDATION" => Category::Structural,
            "HVAC" | "PLUMBING" | "ELECTRICAL" => Category::Mechanical,
            _ => Category::Cosmetic,
        },
    }
}

/// Per-item quantity overrides: fixed per-house assumptions (12 windows,
/// 8 doors, 2 bathrooms, 1 panel), single-unit systems, fixed runs, and
/// the whole-house re-pipe floor.
fn quantity_override(item_code: &str) -> Option<QuantityRule> {
    let rule = match item_code {
        "EXTERIOR_WINDOW_REPLACE" => QuantityRule::Fixed(12.0),
        "INTERIOR_DOOR_REPLACE" => QuantityRule::Fixed(8.0),
        "INTERIOR_BATH_REFRESH" => QuantityRule::Fixed(2.0),
        "ELECTRICAL_PANEL_REPLACE" => QuantityRule::Fixed(1.0),
        "HVAC_SYSTEM_REPLACE" => QuantityRule::Fixed(1.0),
        "FOUNDATION_SLAB_REPAIR" => QuantityRule::Fixed(1.0),
        "PLUMBING_SEWER_LATERAL" => QuantityRule::Fixed(45.0),
        "INTERIOR_KITCHEN_CABINETS" => QuantityRule::Fixed(24.0),
        "EXTERIOR_DECK_REBUILD" => QuantityRule::Fixed(200.0),
        "PLUMBING_SUPPLY_REPIPE" => QuantityRule::InteriorSqftFloor(1200.0),
        "ELECTRICAL_BRANCH_REWIRE" => QuantityRule::HouseSqft,
        _ => return None,
    };
    Some(rule)
}

fn default_rule(unit: MeasureUnit) -> QuantityRule {
    match unit {
        MeasureUnit::Square => QuantityRule::RoofSquares,
        MeasureUnit::WallSquare => QuantityRule::WallSquares,
        MeasureUnit::Sqft => QuantityRule::InteriorSqft,
        MeasureUnit::Each | MeasureUnit::Unit => QuantityRule::Fixed(1.0),
        MeasureUnit::LinearFeet => QuantityRule::PerimeterFeet,
        MeasureUnit::Acre => QuantityRule::ExteriorAcres,
    }
}

/// Derive the priced quantity for an item
pub fn quantity(item_code: &str, unit: MeasureUnit, scale: &EstimatedScale) -> f64 {
    let rule = quantity_override(item_code).unwrap_or_else(|| default_rule(unit));
    match rule {
        QuantityRule::RoofSquares => scale.roof_squares,
        QuantityRule::WallSquares => scale.wall_squares,
        QuantityRule::InteriorSqft => scale.interior_sqft,
        QuantityRule::HouseSqft => scale.house_sqft,
        QuantityRule::InteriorSqftFloor(floor) => scale.interior_sqft.max(floor),
        QuantityRule::PerimeterFeet => scale.perimeter_feet,
        QuantityRule::ExteriorAcres => scale.exterior_acres(),
        QuantityRule::Fixed(count) => count,
    }
}

/// One declared forensic observation mapped to its affected item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForensicRule {
    pub item_code: &'static str,
    pub multiplier: f64,
    pub hazard: &'static str,
}

/// The forensic observations the user actually declared, each with its
/// target item and fixed cost multiplier
pub fn forensic_rules(flags: &ForensicFlags) -> Vec<ForensicRule> {
    let mut rules = Vec::new();
    if flags.fpe_panel {
        rules.push(ForensicRule {
            item_code: "ELECTRICAL_PANEL_REPLACE",
            multiplier: 2.0,
            hazard: "Federal Pacific Stab-Lok panel",
        });
    }
    if flags.polybutylene {
        rules.push(ForensicRule {
            item_code: "PLUMBING_SUPPLY_REPIPE",
            multiplier: 1.5,
            hazard: "polybutylene supply piping",
        });
    }
    if flags.aluminum_wiring {
        rules.push(ForensicRule {
            item_code: "ELECTRICAL_BRANCH_REWIRE",
            multiplier: 1.8,
            hazard: "aluminum branch wiring",
        });
    }
    if flags.chinese_drywall {
        rules.push(ForensicRule {
            item_code: "INTERIOR_DRYWALL_REPLACE",
            multiplier: 4.0,
            hazard: "sulfur-contaminated drywall",
        });
    }
    rules
}

/// Which items an era hazard reaches. Mirrors the documented matching
/// behavior: plumbing hazards only reach plumbing supply work, panel
/// hazards only the panel, and so on.
const HAZARD_TARGETS: &[(&str, &[&str])] = &[
    ("KNOB_AND_TUBE", &["ELECTRICAL_BRANCH_REWIRE", "ELECTRICAL_PANEL_REPLACE"]),
    ("GALVANIZED_SUPPLY", &["PLUMBING_SUPPLY_REPIPE"]),
    ("ASBESTOS_MATERIALS", &["INTERIOR_DRYWALL_REPLACE", "EXTERIOR_SIDING_REPLACE"]),
    ("CAST_IRON_SEWER", &["PLUMBING_SEWER_LATERAL"]),
    ("ALUMINUM_BRANCH_WIRING", &["ELECTRICAL_BRANCH_REWIRE"]),
    ("FPE_STAB_LOK_PANEL", &["ELECTRICAL_PANEL_REPLACE"]),
    ("POLYBUTYLENE_PIPE", &["PLUMBING_SUPPLY_REPIPE"]),
    ("LP_COMPOSITE_SIDING", &["EXTERIOR_SIDING_REPLACE"]),
    ("CHINESE_DRYWALL", &["INTERIOR_DRYWALL_REPLACE"]),
    ("EIFS_SYNTHETIC_STUCCO", &["EXTERIOR_SIDING_REPLACE"]),
    ("RUSHED_FLASHING_DETAILS", &["ROOFING_ASPHALT_SHINGLE"]),
    ("BUILDER_GRADE_HVAC", &["HVAC_SYSTEM_REPLACE"]),
];

pub fn hazard_applies(hazard_code: &str, item_code: &str) -> bool {
    HAZARD_TARGETS
        .iter()
        .find(|(code, _)| *code == hazard_code)
        .is_some_and(|(_, targets)| targets.contains(&item_code))
}

const CORE_SYSTEM_ITEMS: &[(CoreSystem, &[&str])] = &[
    (CoreSystem::Roofing, &["ROOFING_ASPHALT_SHINGLE", "ROOFING_METAL_UPGRADE"]),
    (CoreSystem::Hvac, &["HVAC_SYSTEM_REPLACE"]),
    (CoreSystem::Plumbing, &["PLUMBING_SUPPLY_REPIPE", "PLUMBING_SEWER_LATERAL"]),
    (CoreSystem::Electrical, &["ELECTRICAL_PANEL_REPLACE", "ELECTRICAL_BRANCH_REWIRE"]),
    (CoreSystem::Foundation, &["FOUNDATION_SLAB_REPAIR"]),
];

/// Which core system an item belongs to, if any
pub fn core_system_of(item_code: &str) -> Option<CoreSystem> {
    CORE_SYSTEM_ITEMS
        .iter()
        .find(|(_, items)| items.contains(&item_code))
        .map(|(system, _)| *system)
}

const LIVING_SPACE_ITEMS: &[(LivingSpace, &[&str])] = &[
    (LivingSpace::Kitchen, &["INTERIOR_KITCHEN_CABINETS"]),
    (LivingSpace::Bathroom, &["INTERIOR_BATH_REFRESH"]),
    (LivingSpace::Flooring, &["INTERIOR_FLOORING_REPLACE"]),
    (LivingSpace::Paint, &["INTERIOR_PAINT_FULL"]),
];

/// Which living space a remodel claim covers an item under, if any
pub fn living_space_of(item_code: &str) -> Option<LivingSpace> {
    LIVING_SPACE_ITEMS
        .iter()
        .find(|(_, items)| items.contains(&item_code))
        .map(|(space, _)| *space)
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Regional market record keyed by metro code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetroRecord {
    /// Labor cost multiplier relative to the national base rate
    pub labor_multiplier: f64,

    /// Material logistics multiplier (freight, supply-house markup)
    pub material_multiplier: f64,

    /// Base dispatch fee a contractor charges to show up in this market
    pub base_mobilization: f64,

    /// Disposal tax rate; dollars per ton is this rate x 100
    pub disposal_tax_rate: f64,

    /// Average house size in square feet
    pub avg_house_sqft: f64,

    /// Average lot size in square feet
    pub avg_lot_sqft: f64,

    /// Dominant foundation construction in this market
    pub foundation_type: String,

    /// Qualitative regional risk summary (climate, soil, code climate)
    pub regional_risk: String,

    /// Qualitative labor market description
    pub labor_market: String,
}

/// Hazard severity tiers; `Critical` is the top tier and compounds cost
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Moderate,
}

/// Qualitative removal/abatement cost tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemovalCostTier {
    Low,
    Moderate,
    High,
}

/// A known construction-period hazard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HazardDefinition {
    /// Hazard code, e.g. "POLYBUTYLENE_PIPE"
    pub code: String,

    pub severity: Severity,

    /// Labor-side remedy cost multiplier, when the hazard complicates the fix
    pub remedy_multiplier: Option<f64>,

    /// Whether a specialist inspection is required before work starts
    pub inspection_mandatory: bool,

    pub removal_cost: RemovalCostTier,

    /// What the hazard is
    pub definition: String,

    /// What it does to the house
    pub damage: String,
}

/// Hazard catalog for one construction era, keyed by era code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EraRecord {
    pub hazards: Vec<HazardDefinition>,

    /// One-line construction-era characterization for the context briefing
    pub feature_hint: String,
}

/// Measurement unit of a construction item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeasureUnit {
    /// Roofing square (100 sqft of roof surface)
    Square,

    /// Wall square (100 sqft of exterior wall surface)
    WallSquare,

    /// Interior square footage
    Sqft,

    Each,

    /// Alias of `Each` kept for library compatibility
    Unit,

    LinearFeet,

    Acre,
}

/// Mobilization priority: primary trades scale their dispatch fee with the
/// regional labor market, secondary trades ride on the metro base fee
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MobilizationTier {
    Primary,
    Secondary,
}

/// Unit economics for one construction item code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceDefinition {
    pub display_name: String,

    pub unit: MeasureUnit,

    /// Material cost range per unit, national baseline
    pub material_low: f64,
    pub material_high: f64,

    pub labor_hours_per_unit: f64,

    /// National base labor rate for this trade, dollars per hour
    pub labor_rate: f64,

    pub mobilization_fee: f64,

    pub mobilization_tier: MobilizationTier,

    pub waste_tons_per_unit: f64,

    /// Below this quantity the short-order penalty applies
    pub min_project_size: f64,

    pub short_order_penalty: f64,
}

/// Construction Item Library: category -> item code -> price definition.
/// `BTreeMap` keeps iteration order stable for regression output.
pub type PriceLibrary = BTreeMap<String, BTreeMap<String, PriceDefinition>>;

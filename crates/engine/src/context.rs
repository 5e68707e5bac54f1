use serde::{Deserialize, Serialize};

/// The user's relationship to the property. Drives strategy selection and
/// whether lived-experience history claims are honored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    Buying,
    Living,
    Investing,
}

/// User-declared, visually confirmed hazard observations. These are
/// independent of construction era and always dominate statistical signals.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForensicFlags {
    #[serde(default)]
    pub aluminum_wiring: bool,

    #[serde(default)]
    pub polybutylene: bool,

    #[serde(default)]
    pub fpe_panel: bool,

    #[serde(default)]
    pub chinese_drywall: bool,
}

impl ForensicFlags {
    /// Defect classes that routinely kill financing/insurance outright
    pub const fn any_deal_killer(&self) -> bool {
        self.chinese_drywall || self.fpe_panel || self.polybutylene
    }
}

/// Core systems a LIVING user can claim as recently replaced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoreSystem {
    Roofing,
    Hvac,
    Plumbing,
    Electrical,
    Foundation,
}

impl CoreSystem {
    pub const fn display_name(self) -> &'static str {
        match self {
            CoreSystem::Roofing => "Roofing",
            CoreSystem::Hvac => "HVAC",
            CoreSystem::Plumbing => "Plumbing",
            CoreSystem::Electrical => "Electrical",
            CoreSystem::Foundation => "Foundation",
        }
    }
}

/// Living spaces a LIVING user can claim as recently remodeled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LivingSpace {
    Kitchen,
    Bathroom,
    Flooring,
    Paint,
}

impl LivingSpace {
    pub const fn display_name(self) -> &'static str {
        match self {
            LivingSpace::Kitchen => "Kitchen",
            LivingSpace::Bathroom => "Bathroom",
            LivingSpace::Flooring => "Flooring",
            LivingSpace::Paint => "Interior paint",
        }
    }
}

/// Everything the engine knows about one user's situation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserContext {
    /// Stated repair budget in dollars
    pub budget: f64,

    pub metro_code: String,

    pub era_code: String,

    /// Declared house size; falls back to the metro average, then 2000 sqft
    #[serde(default)]
    pub house_sqft: Option<f64>,

    pub relationship: Relationship,

    #[serde(default)]
    pub forensic: ForensicFlags,

    /// Core systems the user confirms were recently replaced
    #[serde(default)]
    pub core_system_history: Vec<CoreSystem>,

    /// Living spaces the user confirms were recently remodeled
    #[serde(default)]
    pub living_space_history: Vec<LivingSpace>,
}

impl UserContext {
    /// Minimal context with no declared evidence or history
    pub fn new(
        budget: f64,
        metro_code: impl Into<String>,
        era_code: impl Into<String>,
        relationship: Relationship,
    ) -> Self {
        Self {
            budget,
            metro_code: metro_code.into(),
            era_code: era_code.into(),
            house_sqft: None,
            relationship,
            forensic: ForensicFlags::default(),
            core_system_history: Vec::new(),
            living_space_history: Vec::new(),
        }
    }
}

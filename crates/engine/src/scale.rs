use crate::context::UserContext;
use renoscope_reference::MetroRecord;
use serde::{Deserialize, Serialize};

/// Fallback house size when neither the user nor the metro supplies one
pub const DEFAULT_HOUSE_SQFT: f64 = 2000.0;

const SQFT_PER_ACRE: f64 = 43_560.0;

/// Physical quantities derived from house size and regional averages, plus
/// the metro multipliers carried through so the cost calculator is a
/// function of scale alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimatedScale {
    pub house_sqft: f64,

    /// Roof surface in roofing squares (100 sqft each)
    pub roof_squares: f64,

    /// Exterior wall surface in squares
    pub wall_squares: f64,

    pub hvac_tons: f64,

    /// Conditioned interior work area
    pub interior_sqft: f64,

    /// Lot area not under the house
    pub exterior_sqft: f64,

    pub perimeter_feet: f64,

    pub labor_multiplier: f64,
    pub material_multiplier: f64,
    pub base_mobilization: f64,
    pub disposal_tax_rate: f64,
}

impl EstimatedScale {
    pub fn derive(ctx: &UserContext, metro: &MetroRecord) -> Self {
        let house_sqft = match ctx.house_sqft {
            Some(sqft) if sqft > 0.0 => sqft,
            _ if metro.avg_house_sqft > 0.0 => metro.avg_house_sqft,
            _ => DEFAULT_HOUSE_SQFT,
        };

        Self {
            house_sqft,
            roof_squares: house_sqft * 1.15 / 100.0,
            wall_squares: house_sqft * 0.88 / 100.0,
            hvac_tons: house_sqft / 500.0,
            interior_sqft: house_sqft / 1.5,
            exterior_sqft: (metro.avg_lot_sqft - house_sqft).max(0.0),
            perimeter_feet: 4.0 * house_sqft.sqrt(),
            labor_multiplier: metro.labor_multiplier,
            material_multiplier: metro.material_multiplier,
            base_mobilization: metro.base_mobilization,
            disposal_tax_rate: metro.disposal_tax_rate,
        }
    }

    /// Clearable lot area in acres, floored at a tenth of an acre
    pub fn exterior_acres(&self) -> f64 {
        (self.exterior_sqft / SQFT_PER_ACRE).max(0.1)
    }
}

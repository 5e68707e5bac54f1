mod error;
mod store;
mod types;

pub use error::{DataError, Result};
pub use store::ReferenceStore;
pub use types::{
    EraRecord, HazardDefinition, MeasureUnit, MetroRecord, MobilizationTier, PriceDefinition,
    PriceLibrary, RemovalCostTier, Severity,
};

use crate::error::{DataError, Result};
use crate::types::{EraRecord, MetroRecord, PriceDefinition, PriceLibrary};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::path::Path;

const METROS_FILE: &str = "metros.json";
const ERAS_FILE: &str = "eras.json";
const LIBRARY_FILE: &str = "price_library.json";

static BUILTIN: Lazy<ReferenceStore> = Lazy::new(|| {
    ReferenceStore::from_json(
        include_str!("../data/metros.json"),
        include_str!("../data/eras.json"),
        include_str!("../data/price_library.json"),
    )
    .expect("embedded dataset is valid")
});

/// Process-lifetime reference tables: Metro Index, Era Risk Catalog and the
/// Construction Item Library. Loaded once, read-only thereafter.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    metros: BTreeMap<String, MetroRecord>,
    eras: BTreeMap<String, EraRecord>,
    library: PriceLibrary,
}

impl ReferenceStore {
    pub fn from_parts(
        metros: BTreeMap<String, MetroRecord>,
        eras: BTreeMap<String, EraRecord>,
        library: PriceLibrary,
    ) -> Self {
        Self {
            metros,
            eras,
            library,
        }
    }

    /// Load the three tables from a directory of JSON files
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        log::info!("Loading reference data from {}", dir.display());

        let metros = read_json(dir, METROS_FILE)?;
        let eras = read_json(dir, ERAS_FILE)?;
        let library = read_json(dir, LIBRARY_FILE)?;

        let store = Self::from_parts(metros, eras, library);
        log::info!(
            "Loaded {} metros, {} eras, {} priced items",
            store.metros.len(),
            store.eras.len(),
            store.item_count()
        );
        Ok(store)
    }

    /// Parse the three tables from in-memory JSON
    pub fn from_json(metros: &str, eras: &str, library: &str) -> Result<Self> {
        Ok(Self::from_parts(
            parse_json(METROS_FILE, metros)?,
            parse_json(ERAS_FILE, eras)?,
            parse_json(LIBRARY_FILE, library)?,
        ))
    }

    /// The dataset compiled into the crate, parsed once on first use
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn metro(&self, code: &str) -> Option<&MetroRecord> {
        self.metros.get(code)
    }

    pub fn era(&self, code: &str) -> Option<&EraRecord> {
        self.eras.get(code)
    }

    pub fn metros(&self) -> &BTreeMap<String, MetroRecord> {
        &self.metros
    }

    pub fn eras(&self) -> &BTreeMap<String, EraRecord> {
        &self.eras
    }

    pub fn library(&self) -> &PriceLibrary {
        &self.library
    }

    pub fn item_count(&self) -> usize {
        self.library.values().map(BTreeMap::len).sum()
    }

    /// Look up a price definition by item code, searching all categories
    pub fn price(&self, item_code: &str) -> Option<&PriceDefinition> {
        self.library
            .values()
            .find_map(|items| items.get(item_code))
    }

    /// Sanity-check the loaded tables. Returns human-readable warnings;
    /// an empty list means the dataset is coherent.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (code, metro) in &self.metros {
            if metro.labor_multiplier <= 0.0 || metro.material_multiplier <= 0.0 {
                warnings.push(format!("metro {code}: non-positive multiplier"));
            }
            if metro.avg_house_sqft <= 0.0 {
                warnings.push(format!("metro {code}: non-positive average house size"));
            }
        }

        for (code, era) in &self.eras {
            if era.hazards.is_empty() {
                warnings.push(format!("era {code}: empty hazard catalog"));
            }
            for hazard in &era.hazards {
                if let Some(mult) = hazard.remedy_multiplier {
                    if mult < 1.0 {
                        warnings.push(format!(
                            "era {code}: hazard {} has remedy multiplier below 1.0",
                            hazard.code
                        ));
                    }
                }
            }
        }

        for (category, items) in &self.library {
            for (code, def) in items {
                if def.material_low > def.material_high {
                    warnings.push(format!("{category}/{code}: inverted material range"));
                }
                if def.short_order_penalty < 1.0 {
                    warnings.push(format!("{category}/{code}: penalty below 1.0"));
                }
            }
        }

        for warning in &warnings {
            log::warn!("reference data: {warning}");
        }
        warnings
    }
}

fn read_json<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let path = dir.join(file);
    if !path.exists() {
        return Err(DataError::MissingFile(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(&path)?;
    parse_json(file, &raw)
}

fn parse_json<T: serde::de::DeserializeOwned>(file: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| DataError::JsonError {
        file: file.to_string(),
        source,
    })
}

use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "renoscope.toml";

/// Optional defaults read from `renoscope.toml` in the working directory.
/// Command-line flags always win over the file.
#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct CliConfig {
    /// Directory holding metros.json / eras.json / price_library.json
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub default_metro: Option<String>,

    #[serde(default)]
    pub default_era: Option<String>,
}

impl CliConfig {
    pub(crate) fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    fn load_from(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&raw) {
            Ok(config) => {
                log::debug!("loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("ignoring malformed {}: {err}", path.display());
                Self::default()
            }
        }
    }
}

//! Configuration file loading.
//!
//! Files ending in `.json` are read as JSON, everything else as YAML.

use std::path::Path;

use densha_usb_mascon::{MasconSettings, MasconVariant};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

/// Controller selection plus device settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DenshaConfig {
    pub variant: MasconVariant,
    pub port: u32,
    pub device: MasconSettings,
}

impl DenshaConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&text)?
        } else {
            serde_yaml::from_str(&text)?
        };
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CliError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

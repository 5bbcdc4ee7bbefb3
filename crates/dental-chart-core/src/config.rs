//! Engine configuration.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! patient_id_prefix = "PT-"
//! patient_id_width = 4
//! default_patient_status = "Active"
//! seed_demo_patients = true
//! fallback_cost = { minutes = 30, fee = 150.0 }
//!
//! [export]
//! pretty = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::DEFAULT_FALLBACK;
use crate::models::CostFigures;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Store and engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix of sequential patient ids
    pub patient_id_prefix: String,
    /// Zero-padded width of the numeric part of patient ids
    pub patient_id_width: usize,
    /// Lifecycle label given to new patients
    pub default_patient_status: String,
    /// Start the store with the two demo patients
    pub seed_demo_patients: bool,
    /// Estimate for procedures missing from the cost catalog
    pub fallback_cost: CostFigures,
    pub export: ExportConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            patient_id_prefix: "PT-".into(),
            patient_id_width: 4,
            default_patient_status: "Active".into(),
            seed_demo_patients: true,
            fallback_cost: DEFAULT_FALLBACK,
            export: ExportConfig::default(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Pretty-print JSON exports
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl EngineConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Format the id of the `seq`-th patient (1-based).
    pub fn patient_id(&self, seq: usize) -> String {
        format!(
            "{}{:0width$}",
            self.patient_id_prefix,
            seq,
            width = self.patient_id_width
        )
    }
}

/// Construction configuration
///
/// Knobs for how table classes validate and cast their input. Every field has
/// a default, so a partial JSON document is a valid configuration.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionConfig {
    /// Cast configuration
    pub cast: CastConfig,

    /// Row handling
    pub rows: RowConfig,

    /// Input name validation
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Fail on values the storage type cannot hold instead of nulling them
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowConfig {
    /// Accept positional rows when the caller does not say otherwise
    pub allow_positional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject input names outside the allowed-name set
    pub reject_unknown: bool,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reject_unknown: true,
        }
    }
}

impl ConstructionConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse construction config")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize construction config")
    }
}

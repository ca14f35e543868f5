//! Tunable constants for tracing and budget classification.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

/// Received-power classification boundaries in dBm.
///
/// `final <= fail_at_dbm` is a failure, `final >= ok_from_dbm` is ok,
/// anything in between is marginal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BudgetThresholds {
    pub fail_at_dbm: f64,
    pub ok_from_dbm: f64,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            fail_at_dbm: -28.0,
            ok_from_dbm: -25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TraceConfig {
    /// Upper bound on traversal steps. Guards against cyclic connection graphs.
    pub max_steps: usize,
    pub thresholds: BudgetThresholds,
    /// Used when a cable has no catalog entry (or an unreadable one).
    pub default_cable_attenuation_db_per_km: f64,
    /// Launch power assumed for an OLT that matches no catalog entry.
    pub default_olt_power_dbm: f64,
    /// Fixed loss recorded for every patch panel crossing.
    pub dio_connector_loss_db: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            thresholds: BudgetThresholds::default(),
            default_cable_attenuation_db_per_km: 0.3,
            default_olt_power_dbm: 3.0,
            dio_connector_loss_db: 0.5,
        }
    }
}

impl TraceConfig {
    /// Read a JSON config file. Missing fields keep their defaults, unknown
    /// fields are rejected.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path.as_std_path())
            .with_context(|| format!("Failed to read {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("Failed to parse config {}", path))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

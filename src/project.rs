//! Project snapshots: a network plus the catalogs it refers to, as stored by
//! the planning editor.

use crate::catalog::Catalogs;
use crate::model::Network;
use anyhow::{Context, Result, anyhow};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub network: Network,
    #[serde(default)]
    pub catalogs: Catalogs,
}

impl Project {
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path.as_std_path())
            .with_context(|| format!("Failed to read {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("Failed to parse project {}", path))
    }

    /// Parse a project document. A bare network document (no `network` key,
    /// top-level `boxes`/`pops`/`cables`) is accepted with empty catalogs.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let v: serde_json::Value = serde_json::from_str(text)?;
        if !v.is_object() {
            return Err(anyhow!("Project must be a JSON object"));
        }
        if v.get("network").is_some() {
            Ok(serde_json::from_value(v)?)
        } else {
            let network: Network = serde_json::from_value(v)?;
            Ok(Project {
                network,
                catalogs: Catalogs::default(),
            })
        }
    }
}

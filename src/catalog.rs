//! Device catalogs and loss / launch power resolution.
//!
//! Catalog data comes from user-maintained tables of uneven quality, so
//! every lookup here degrades to a defined default instead of failing:
//!
//! - splitter and fusion loss: `0` when nothing matches
//! - cable attenuation: the configured default (0.3 dB/km)
//! - OLT launch power: the configured default (3 dBm)
//!
//! Numeric catalog fields are modelled by [`AttenuationValue`], which accepts
//! plain numbers, numeric strings and legacy `{ "value": .. }` / `{ "x": .. }`
//! objects, and swallows anything else.

use crate::geo::cable_length;
use crate::model::{Cable, FusionPoint, Splitter};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Numeric catalog values
// ────────────────────────────────────────────────────────────────────────────

/// A catalog number in any of the shapes found in stored catalogs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttenuationValue {
    Number(f64),
    Raw(String),
    /// Object carrying a `value` and/or `x` key.
    Legacy { value: Option<f64>, x: Option<f64> },
    /// Anything else (booleans, arrays, nested garbage). Never yields a number.
    Other(Value),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AttenuationRepr {
    Number(f64),
    Raw(String),
    Object(Map<String, Value>),
    Other(Value),
}

impl<'de> Deserialize<'de> for AttenuationValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match AttenuationRepr::deserialize(deserializer)? {
            AttenuationRepr::Number(n) => AttenuationValue::Number(n),
            AttenuationRepr::Raw(s) => AttenuationValue::Raw(s),
            AttenuationRepr::Object(map) if map.contains_key("value") || map.contains_key("x") => {
                AttenuationValue::Legacy {
                    value: map.get("value").and_then(Value::as_f64),
                    x: map.get("x").and_then(Value::as_f64),
                }
            }
            AttenuationRepr::Object(map) => AttenuationValue::Other(Value::Object(map)),
            AttenuationRepr::Other(v) => AttenuationValue::Other(v),
        })
    }
}

impl AttenuationValue {
    /// First readable finite number, trying the representations in order.
    pub fn as_db(&self) -> Option<f64> {
        let v = match self {
            AttenuationValue::Number(n) => Some(*n),
            AttenuationValue::Raw(s) => s.trim().parse::<f64>().ok(),
            AttenuationValue::Legacy { value, x } => value.or(*x),
            AttenuationValue::Other(_) => None,
        };
        v.filter(|n| n.is_finite())
    }
}

/// Total normalization: unreadable or absent values become `0`.
pub fn normalize_attenuation(value: Option<&AttenuationValue>) -> f64 {
    value.and_then(AttenuationValue::as_db).unwrap_or(0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterCatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attenuation: Option<AttenuationValue>,
    /// Number of outputs. When absent the ratio is read from a `1:N` name.
    #[serde(default)]
    pub outputs: Option<u32>,
}

impl SplitterCatalogEntry {
    pub fn output_count(&self) -> Option<usize> {
        self.outputs
            .map(|n| n as usize)
            .or_else(|| parse_split_ratio(&self.name))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableCatalogEntry {
    pub id: String,
    pub name: String,
    /// dB per kilometer.
    #[serde(default)]
    pub attenuation: Option<AttenuationValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionCatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attenuation: Option<AttenuationValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OltCatalogEntry {
    pub id: String,
    pub name: String,
    /// Launch power in dBm.
    #[serde(default)]
    pub output_power: Option<AttenuationValue>,
}

/// All catalogs consulted during a trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogs {
    #[serde(default)]
    pub splitters: Vec<SplitterCatalogEntry>,
    #[serde(default)]
    pub cables: Vec<CableCatalogEntry>,
    #[serde(default)]
    pub fusions: Vec<FusionCatalogEntry>,
    #[serde(default)]
    pub olts: Vec<OltCatalogEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Read `N` out of a `1:N` (or `1xN`) ratio embedded in a name.
fn parse_split_ratio(name: &str) -> Option<usize> {
    let lower = name.to_ascii_lowercase();
    for sep in [':', 'x', '/'] {
        let pat = format!("1{}", sep);
        let mut search = lower.as_str();
        while let Some(pos) = search.find(&pat) {
            let preceded_by_digit = pos > 0 && search.as_bytes()[pos - 1].is_ascii_digit();
            let rest = &search[pos + pat.len()..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !preceded_by_digit && !digits.is_empty() {
                if let Ok(n) = digits.parse::<usize>() {
                    return Some(n);
                }
            }
            search = &search[pos + pat.len()..];
        }
    }
    None
}

impl Catalogs {
    /// Catalog entry for a splitter: direct catalog id, then exact type name,
    /// then trimmed case-insensitive type name, then output count alone.
    pub fn find_splitter(&self, splitter: &Splitter) -> Option<&SplitterCatalogEntry> {
        if let Some(cid) = splitter.catalog_id.as_deref() {
            if let Some(e) = self.splitters.iter().find(|e| e.id == cid) {
                return Some(e);
            }
        }
        let ty = splitter.splitter_type.as_str();
        if !ty.trim().is_empty() {
            if let Some(e) = self.splitters.iter().find(|e| e.name == ty) {
                return Some(e);
            }
            if let Some(e) = self.splitters.iter().find(|e| same_name(&e.name, ty)) {
                return Some(e);
            }
        }
        let ratio = splitter.ratio();
        if ratio == 0 {
            return None;
        }
        self.splitters
            .iter()
            .find(|e| e.output_count() == Some(ratio))
    }

    pub fn find_cable(&self, cable: &Cable) -> Option<&CableCatalogEntry> {
        let cid = cable.catalog_id.as_deref()?;
        self.cables.iter().find(|e| e.id == cid)
    }

    /// Catalog entry for a fusion: direct catalog id first, legacy type name second.
    pub fn find_fusion(&self, fusion: &FusionPoint) -> Option<&FusionCatalogEntry> {
        if let Some(cid) = fusion.catalog_id.as_deref() {
            if let Some(e) = self.fusions.iter().find(|e| e.id == cid) {
                return Some(e);
            }
        }
        let ty = fusion.fusion_type.as_deref()?;
        if ty.trim().is_empty() {
            return None;
        }
        self.fusions.iter().find(|e| same_name(&e.name, ty))
    }

    /// Entry whose name is the longest case-insensitive prefix of `olt_name`.
    /// Ties keep the first entry in catalog order.
    pub fn find_olt(&self, olt_name: &str) -> Option<&OltCatalogEntry> {
        let target = olt_name.trim().to_lowercase();
        let mut best: Option<(&OltCatalogEntry, usize)> = None;
        for entry in &self.olts {
            let prefix = entry.name.trim().to_lowercase();
            if prefix.is_empty() || !target.starts_with(&prefix) {
                continue;
            }
            if best.is_none_or(|(_, len)| prefix.len() > len) {
                best = Some((entry, prefix.len()));
            }
        }
        best.map(|(e, _)| e)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Loss resolution
// ────────────────────────────────────────────────────────────────────────────

/// Insertion loss of a splitter in dB. Unknown splitters count as `0`.
pub fn resolve_splitter_loss(_splitter: &Splitter, entry: Option<&SplitterCatalogEntry>) -> f64 {
    normalize_attenuation(entry.and_then(|e| e.attenuation.as_ref()))
}

/// Attenuation of a cable run: kilometers times dB/km.
pub fn resolve_cable_loss(
    cable: &Cable,
    entry: Option<&CableCatalogEntry>,
    default_db_per_km: f64,
) -> f64 {
    let per_km = entry
        .and_then(|e| e.attenuation.as_ref())
        .and_then(AttenuationValue::as_db)
        .unwrap_or(default_db_per_km);
    cable_length(cable) / 1000.0 * per_km
}

pub fn resolve_fusion_loss(_fusion: &FusionPoint, entry: Option<&FusionCatalogEntry>) -> f64 {
    normalize_attenuation(entry.and_then(|e| e.attenuation.as_ref()))
}

/// Launch power of an OLT in dBm, matched by longest name prefix.
pub fn resolve_olt_power(olt_name: &str, catalogs: &Catalogs, default_dbm: f64) -> f64 {
    catalogs
        .find_olt(olt_name)
        .and_then(|e| e.output_power.as_ref())
        .and_then(AttenuationValue::as_db)
        .unwrap_or(default_dbm)
}

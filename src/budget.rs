//! Path compression and optical budget evaluation.

use crate::config::BudgetThresholds;
use serde::{Deserialize, Serialize};

/// Source label reported when a trace finds no OLT.
pub const NO_SIGNAL: &str = "NO SIGNAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    Olt,
    Dio,
    Cable,
    Fusion,
    Splitter,
}

/// One traversed element with the loss it contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: String,
    pub name: String,
    /// dB
    pub loss: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Meters; cables only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStatus {
    Ok,
    Marginal,
    Fail,
}

/// Why a trace stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum Termination {
    /// An OLT port was reached.
    Source,
    /// Nothing is connected to the port the walk arrived at.
    #[serde(rename_all = "camelCase")]
    NoConnection { node_id: String, port_id: String },
    /// A cable whose ends are not anchored at the node it was entered from.
    #[serde(rename_all = "camelCase")]
    FloatingCable { cable_id: String },
    /// A cable leads to a node id that is not in the network.
    #[serde(rename_all = "camelCase")]
    MissingNode { node_id: String },
    /// An edge leads to a port no element owns (or that cannot feed signal).
    #[serde(rename_all = "camelCase")]
    UnrecognizedPort { node_id: String, port_id: String },
    /// The step limit cut the walk short, typically because of a cycle.
    #[serde(rename_all = "camelCase")]
    StepLimit { steps: usize },
}

/// Location of the OLT port that feeds the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OltLocation {
    pub name: String,
    pub slot: u32,
    pub port: u32,
}

/// Budget report for one splitter, path ordered source → splitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpticalPathResult {
    pub path: Vec<PathElement>,
    pub total_loss: f64,
    /// Launch power of the source, `0` when none was found.
    pub olt_power: f64,
    /// `-inf` when no source was found (serialized as `null`).
    pub final_power: f64,
    pub status: SignalStatus,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub olt_details: Option<OltLocation>,
    pub termination: Termination,
}

impl OpticalPathResult {
    pub fn has_source(&self) -> bool {
        self.olt_details.is_some()
    }

    pub fn truncated(&self) -> bool {
        matches!(self.termination, Termination::StepLimit { .. })
    }
}

/// Merge every run of consecutive cable elements into one entry. The merged
/// entry keeps the first cable's id and name and sums loss and length.
pub fn compress_path(path: Vec<PathElement>) -> Vec<PathElement> {
    let mut out: Vec<PathElement> = Vec::with_capacity(path.len());
    let mut run = 1usize;
    for el in path {
        if let Some(prev) = out.last_mut() {
            if prev.kind == ElementKind::Cable && el.kind == ElementKind::Cable {
                prev.loss += el.loss;
                prev.length = match (prev.length, el.length) {
                    (None, None) => None,
                    (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
                };
                run += 1;
                prev.details = Some(format!("{} segments", run));
                continue;
            }
        }
        run = 1;
        out.push(el);
    }
    out
}

/// `[ok_from, ∞)` ok, `(fail_at, ok_from)` marginal, `fail_at` and below
/// fail. `-inf` and NaN fail.
pub fn classify(final_power: f64, thresholds: &BudgetThresholds) -> SignalStatus {
    if final_power >= thresholds.ok_from_dbm {
        SignalStatus::Ok
    } else if final_power > thresholds.fail_at_dbm {
        SignalStatus::Marginal
    } else {
        SignalStatus::Fail
    }
}

/// A sourced OLT together with its launch power.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub location: OltLocation,
    pub power_dbm: f64,
}

/// Compress the raw path and compute the budget.
pub fn evaluate(
    raw_path: Vec<PathElement>,
    source: Option<SourceInfo>,
    termination: Termination,
    thresholds: &BudgetThresholds,
) -> OpticalPathResult {
    let path = compress_path(raw_path);
    let total_loss: f64 = path.iter().map(|e| e.loss).sum();
    match source {
        Some(src) => {
            let final_power = src.power_dbm - total_loss;
            OpticalPathResult {
                path,
                total_loss,
                olt_power: src.power_dbm,
                final_power,
                status: classify(final_power, thresholds),
                source_name: src.location.name.clone(),
                olt_details: Some(src.location),
                termination,
            }
        }
        None => OpticalPathResult {
            path,
            total_loss,
            olt_power: 0.0,
            final_power: f64::NEG_INFINITY,
            status: SignalStatus::Fail,
            source_name: NO_SIGNAL.to_string(),
            olt_details: None,
            termination,
        },
    }
}

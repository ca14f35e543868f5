//! Network-wide audit: trace every splitter of every node.
//!
//! Traces are independent reads of the same snapshot, so they run in
//! parallel on the rayon pool. Results keep network order (boxes, then
//! points of presence, then splitters within a node).

use crate::budget::{OpticalPathResult, SignalStatus};
use crate::error::TraceError;
use crate::trace::PathTracer;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterAudit {
    pub box_id: String,
    pub box_name: String,
    pub splitter_id: String,
    pub splitter_name: String,
    #[serde(with = "audit_outcome")]
    pub result: Result<OpticalPathResult, TraceError>,
}

mod audit_outcome {
    use super::*;
    use serde::Serializer;

    #[derive(Serialize)]
    #[serde(untagged)]
    enum Outcome<'a> {
        Ok(&'a OpticalPathResult),
        Err { error: String },
    }

    pub fn serialize<S: Serializer>(
        value: &Result<OpticalPathResult, TraceError>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Ok(r) => Outcome::Ok(r).serialize(serializer),
            Err(e) => Outcome::Err {
                error: e.to_string(),
            }
            .serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub splitters: usize,
    pub ok: usize,
    pub marginal: usize,
    pub fail: usize,
    /// Failures caused by a missing source rather than a weak one.
    pub no_source: usize,
    pub errors: usize,
    /// Lowest received power among sourced splitters, dBm.
    pub worst_final_power: Option<f64>,
}

impl AuditSummary {
    pub fn from_audits(audits: &[SplitterAudit]) -> Self {
        let mut summary = AuditSummary {
            splitters: audits.len(),
            ..Default::default()
        };
        for audit in audits {
            let Ok(result) = &audit.result else {
                summary.errors += 1;
                continue;
            };
            match result.status {
                SignalStatus::Ok => summary.ok += 1,
                SignalStatus::Marginal => summary.marginal += 1,
                SignalStatus::Fail => summary.fail += 1,
            }
            if result.has_source() {
                let worst = summary.worst_final_power.get_or_insert(result.final_power);
                *worst = worst.min(result.final_power);
            } else {
                summary.no_source += 1;
            }
        }
        summary
    }
}

/// Trace every splitter reachable through `tracer`'s network.
pub fn audit_network(tracer: &PathTracer<'_>) -> Vec<SplitterAudit> {
    let jobs: Vec<_> = tracer
        .network()
        .nodes()
        .flat_map(|node| node.splitters().iter().map(move |s| (node, s)))
        .collect();

    jobs.par_iter()
        .map(|(node, s)| SplitterAudit {
            box_id: node.id().to_string(),
            box_name: node.name().to_string(),
            splitter_id: s.id.clone(),
            splitter_name: s.display_name().to_string(),
            result: tracer.trace(&s.id, node.id(), None),
        })
        .collect()
}

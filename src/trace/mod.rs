//! Backward optical path tracer.
//!
//! Starting at a splitter's input port, the tracer keeps asking "what feeds
//! this port?" in the current node's connection graph and follows the answer
//! upstream:
//!
//! - cable fiber: record the cable, continue in the cable's other end node on
//!   the same fiber id
//! - fusion: record the splice, continue from its opposite port
//! - output of another splitter: record it, continue from its input port
//! - DIO port: record the fixed connector loss, continue from the same port
//!   on its other edge
//! - OLT port: record the source and stop
//!
//! Anything else ends the walk without a source. The walk is bounded by
//! [`TraceConfig::max_steps`] so cyclic data always yields a partial result.
//!
//! - [`step`] – the single-step state machine

pub mod step;

pub use step::{Step, TraceState, TraceWalk};

use crate::budget::{OpticalPathResult, Termination, evaluate};
use crate::catalog::Catalogs;
use crate::config::TraceConfig;
use crate::error::{TraceError, TraceResult};
use crate::model::{Network, NodeRef, SpliceBox};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Reusable tracer over one network snapshot. Holds only shared references,
/// so it can be used from several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct PathTracer<'a> {
    network: &'a Network,
    catalogs: &'a Catalogs,
    config: &'a TraceConfig,
}

impl<'a> PathTracer<'a> {
    pub fn new(network: &'a Network, catalogs: &'a Catalogs, config: &'a TraceConfig) -> Self {
        Self {
            network,
            catalogs,
            config,
        }
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// Trace the splitter `splitter_id` in box `box_id` back to its source.
    ///
    /// `box_override` replaces the stored box of the same id, which lets the
    /// editor audit unsaved changes. It is ignored when its id differs.
    pub fn trace(
        &self,
        splitter_id: &str,
        box_id: &str,
        box_override: Option<&SpliceBox>,
    ) -> TraceResult<OpticalPathResult> {
        let mut walk = TraceWalk::new(self.network, self.catalogs, self.config, box_override);
        let start = walk
            .resolve_node(box_id)
            .ok_or_else(|| TraceError::NodeNotFound(box_id.to_string()))?;
        if matches!(start, NodeRef::Pop(_)) && start.splitters().is_empty() {
            return Err(TraceError::NoSplitters(box_id.to_string()));
        }
        let splitter = start
            .splitter(splitter_id)
            .ok_or_else(|| TraceError::SplitterNotFound {
                box_id: box_id.to_string(),
                splitter_id: splitter_id.to_string(),
            })?;

        let mut path = VecDeque::new();
        path.push_front(walk.splitter_element(splitter));
        let mut state = TraceState::start(box_id, splitter.input_port_id.as_str());

        for _ in 0..self.config.max_steps {
            match walk.step(&state) {
                Step::Continue { next, element } => {
                    path.push_front(element);
                    state = next;
                }
                Step::Finish {
                    element,
                    source,
                    termination,
                } => {
                    if let Some(element) = element {
                        path.push_front(element);
                    }
                    debug!(splitter = splitter_id, box_id, ?termination, "trace finished");
                    return Ok(evaluate(
                        path.into(),
                        source,
                        termination,
                        &self.config.thresholds,
                    ));
                }
            }
        }

        warn!(
            splitter = splitter_id,
            box_id,
            steps = self.config.max_steps,
            "trace hit the step limit, returning a partial path"
        );
        Ok(evaluate(
            path.into(),
            None,
            Termination::StepLimit {
                steps: self.config.max_steps,
            },
            &self.config.thresholds,
        ))
    }
}

/// Trace with the default [`TraceConfig`].
pub fn trace_path(
    splitter_id: &str,
    box_id: &str,
    network: &Network,
    catalogs: &Catalogs,
    box_override: Option<&SpliceBox>,
) -> TraceResult<OpticalPathResult> {
    let config = TraceConfig::default();
    PathTracer::new(network, catalogs, &config).trace(splitter_id, box_id, box_override)
}

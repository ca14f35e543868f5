//! Single traversal steps.
//!
//! A [`TraceWalk`] owns everything a step needs to read (network, catalogs,
//! config, optional in-editor box) plus a per-walk cache of [`PortIndex`]es.
//! Each call to [`TraceWalk::step`] consumes one edge and either yields the
//! next cursor or finishes the walk.

use crate::budget::{ElementKind, OltLocation, PathElement, SourceInfo, Termination};
use crate::catalog::{
    Catalogs, resolve_cable_loss, resolve_fusion_loss, resolve_olt_power, resolve_splitter_loss,
};
use crate::config::TraceConfig;
use crate::geo::cable_length;
use crate::graph::{PortIndex, PortOwner, fusion_port_id};
use crate::model::{Cable, Dio, FusionPoint, Network, NodeRef, Olt, SpliceBox, Splitter};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Cursor of the backward walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceState {
    /// Node whose connection graph is searched next.
    pub node_id: String,
    /// Port whose feeder is searched next.
    pub port_id: String,
    /// `(node id, connection id)` of the edge consumed by the previous step.
    pub last_edge: Option<(String, String)>,
}

impl TraceState {
    pub fn start(node_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            port_id: port_id.into(),
            last_edge: None,
        }
    }

    /// The edge to skip when searching from `node_id`.
    fn excluded_edge(&self) -> Option<&str> {
        self.last_edge
            .as_ref()
            .filter(|(node, _)| *node == self.node_id)
            .map(|(_, edge)| edge.as_str())
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// An element was crossed and the walk goes on from `next`.
    Continue {
        next: TraceState,
        element: PathElement,
    },
    /// The walk is over. `element` is the last element crossed, if any.
    Finish {
        element: Option<PathElement>,
        source: Option<SourceInfo>,
        termination: Termination,
    },
}

pub struct TraceWalk<'a> {
    network: &'a Network,
    catalogs: &'a Catalogs,
    config: &'a TraceConfig,
    box_override: Option<&'a SpliceBox>,
    indexes: HashMap<String, PortIndex<'a>>,
}

impl<'a> TraceWalk<'a> {
    pub fn new(
        network: &'a Network,
        catalogs: &'a Catalogs,
        config: &'a TraceConfig,
        box_override: Option<&'a SpliceBox>,
    ) -> Self {
        Self {
            network,
            catalogs,
            config,
            box_override,
            indexes: HashMap::new(),
        }
    }

    /// The override box wins whenever its id matches.
    pub fn resolve_node(&self, id: &str) -> Option<NodeRef<'a>> {
        match self.box_override {
            Some(b) if b.id == id => Some(NodeRef::Box(b)),
            _ => self.network.node(id),
        }
    }

    fn index(&mut self, node: NodeRef<'a>) -> &PortIndex<'a> {
        let network = self.network;
        self.indexes
            .entry(node.id().to_string())
            .or_insert_with(|| PortIndex::build(node, network))
    }

    pub fn step(&mut self, state: &TraceState) -> Step {
        let Some(node) = self.resolve_node(&state.node_id) else {
            warn!(node = %state.node_id, "trace entered a node that does not exist");
            return Step::Finish {
                element: None,
                source: None,
                termination: Termination::MissingNode {
                    node_id: state.node_id.clone(),
                },
            };
        };

        let port = state.port_id.as_str();
        let index = self.index(node);
        let Some(edge) = index.feeding_edge(port, state.excluded_edge()) else {
            // A splitter wired straight into an OLT port of the same node.
            if let Some(PortOwner::OltPort { olt, index }) = index.owner(port) {
                let (element, source) = self.olt_element(olt, index);
                return Step::Finish {
                    element: Some(element),
                    source: Some(source),
                    termination: Termination::Source,
                };
            }
            debug!(node = %state.node_id, port, "no feeding connection");
            return Step::Finish {
                element: None,
                source: None,
                termination: Termination::NoConnection {
                    node_id: state.node_id.clone(),
                    port_id: port.to_string(),
                },
            };
        };
        if edge.candidates > 1 {
            warn!(
                node = %state.node_id,
                port,
                candidates = edge.candidates,
                chosen = %edge.connection.id,
                "port has several feeding connections, using the first"
            );
        }

        let owner = index.owner(edge.upstream);
        debug!(
            node = %state.node_id,
            port,
            upstream = edge.upstream,
            via = %edge.connection.id,
            owner = owner.map(|o| o.kind()).unwrap_or("unknown"),
            "trace step"
        );
        let last_edge = Some((state.node_id.clone(), edge.connection.id.clone()));
        let advance = |node_id: &str, port_id: &str, element: PathElement| Step::Continue {
            next: TraceState {
                node_id: node_id.to_string(),
                port_id: port_id.to_string(),
                last_edge: last_edge.clone(),
            },
            element,
        };

        match owner {
            Some(PortOwner::CableFiber { cable, fiber }) => {
                let element = self.cable_element(cable, fiber);
                match cable.other_end(&state.node_id) {
                    Some(other) => advance(other, edge.upstream, element),
                    None => Step::Finish {
                        element: Some(element),
                        source: None,
                        termination: Termination::FloatingCable {
                            cable_id: cable.id.clone(),
                        },
                    },
                }
            }
            Some(PortOwner::Fusion { fusion, side }) => {
                let element = self.fusion_element(fusion);
                let through = fusion_port_id(&fusion.id, side.opposite());
                advance(state.node_id.as_str(), through.as_str(), element)
            }
            Some(PortOwner::SplitterOutput { splitter, .. }) => {
                let element = self.splitter_element(splitter);
                advance(state.node_id.as_str(), splitter.input_port_id.as_str(), element)
            }
            Some(PortOwner::OltPort { olt, index }) => {
                let (element, source) = self.olt_element(olt, index);
                Step::Finish {
                    element: Some(element),
                    source: Some(source),
                    termination: Termination::Source,
                }
            }
            Some(PortOwner::DioPort { dio, index }) => {
                let element = self.dio_element(dio, index);
                advance(state.node_id.as_str(), edge.upstream, element)
            }
            Some(PortOwner::SplitterInput { .. }) | None => Step::Finish {
                element: None,
                source: None,
                termination: Termination::UnrecognizedPort {
                    node_id: state.node_id.clone(),
                    port_id: edge.upstream.to_string(),
                },
            },
        }
    }

    // ── element builders ────────────────────────────────────────────────────

    pub fn splitter_element(&self, splitter: &Splitter) -> PathElement {
        let entry = self.catalogs.find_splitter(splitter);
        let ratio = format!("1:{}", splitter.ratio());
        let details = match entry {
            Some(e) => format!("{} ({})", ratio, e.name),
            None => format!("{} (no catalog entry)", ratio),
        };
        PathElement {
            kind: ElementKind::Splitter,
            id: splitter.id.clone(),
            name: splitter.display_name().to_string(),
            loss: resolve_splitter_loss(splitter, entry),
            details: Some(details),
            length: None,
        }
    }

    fn cable_element(&self, cable: &Cable, fiber: u32) -> PathElement {
        let entry = self.catalogs.find_cable(cable);
        let loss = resolve_cable_loss(
            cable,
            entry,
            self.config.default_cable_attenuation_db_per_km,
        );
        PathElement {
            kind: ElementKind::Cable,
            id: cable.id.clone(),
            name: cable.display_name().to_string(),
            loss,
            details: Some(format!("fiber {}", fiber + 1)),
            length: Some(cable_length(cable)),
        }
    }

    fn fusion_element(&self, fusion: &FusionPoint) -> PathElement {
        let entry = self.catalogs.find_fusion(fusion);
        PathElement {
            kind: ElementKind::Fusion,
            id: fusion.id.clone(),
            name: fusion.display_name().to_string(),
            loss: resolve_fusion_loss(fusion, entry),
            details: entry.map(|e| e.name.clone()),
            length: None,
        }
    }

    fn dio_element(&self, dio: &Dio, index: usize) -> PathElement {
        PathElement {
            kind: ElementKind::Dio,
            id: dio.id.clone(),
            name: if dio.name.is_empty() {
                dio.id.clone()
            } else {
                dio.name.clone()
            },
            loss: self.config.dio_connector_loss_db,
            details: Some(format!("port {}", index + 1)),
            length: None,
        }
    }

    fn olt_element(&self, olt: &Olt, index: usize) -> (PathElement, SourceInfo) {
        let (slot, port) = olt.slot_port(index);
        let power_dbm =
            resolve_olt_power(&olt.name, self.catalogs, self.config.default_olt_power_dbm);
        let element = PathElement {
            kind: ElementKind::Olt,
            id: olt.id.clone(),
            name: olt.name.clone(),
            loss: 0.0,
            details: Some(format!("slot {} / port {}", slot, port)),
            length: None,
        };
        let source = SourceInfo {
            location: OltLocation {
                name: olt.name.clone(),
                slot,
                port,
            },
            power_dbm,
        };
        (element, source)
    }
}

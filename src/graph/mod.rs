//! Fiber-connection graph of a single node.
//!
//! [`PortIndex`] resolves every port id that occurs in a box or point of
//! presence to the element owning it, once, so the tracer can dispatch on a
//! closed [`PortOwner`] enum instead of re-inspecting id strings each step.
//! It also keeps the connections incident to each port in connection order.
//!
//! - [`ports`] – port id conventions (`-fiber-N`, `-a`/`-b`)
//! - [`integrity`] – data-integrity checks over the same index

pub mod integrity;
pub mod ports;

pub use ports::{FusionSide, fusion_port_id, parse_fiber_port};

use crate::model::{Cable, Connection, Dio, FusionPoint, Network, NodeRef, Olt, Splitter};
use std::collections::HashMap;

/// What a port id belongs to inside one node.
#[derive(Debug, Clone, Copy)]
pub enum PortOwner<'a> {
    CableFiber { cable: &'a Cable, fiber: u32 },
    Fusion { fusion: &'a FusionPoint, side: FusionSide },
    SplitterOutput { splitter: &'a Splitter, index: usize },
    SplitterInput { splitter: &'a Splitter },
    OltPort { olt: &'a Olt, index: usize },
    DioPort { dio: &'a Dio, index: usize },
}

impl PortOwner<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            PortOwner::CableFiber { .. } => "cable fiber",
            PortOwner::Fusion { .. } => "fusion",
            PortOwner::SplitterOutput { .. } => "splitter output",
            PortOwner::SplitterInput { .. } => "splitter input",
            PortOwner::OltPort { .. } => "OLT port",
            PortOwner::DioPort { .. } => "DIO port",
        }
    }
}

/// The edge chosen to feed a port.
#[derive(Debug, Clone, Copy)]
pub struct FeedingEdge<'a> {
    pub connection: &'a Connection,
    /// Port at the other end of `connection`.
    pub upstream: &'a str,
    /// How many edges (after exclusion) were eligible. More than one means
    /// the tie-break picked one of them.
    pub candidates: usize,
}

/// Port ownership and adjacency for one node.
#[derive(Debug, Clone)]
pub struct PortIndex<'a> {
    node: NodeRef<'a>,
    owners: HashMap<String, PortOwner<'a>>,
    incident: HashMap<&'a str, Vec<usize>>,
}

impl<'a> PortIndex<'a> {
    /// Index a node. Cable fibers are recognised from the node's connection
    /// endpoints and must name a cable present in `network`.
    ///
    /// When two owners claim the same id, the first one in this order wins:
    /// cable fiber, fusion, splitter output, OLT port, DIO port, splitter input.
    pub fn build(node: NodeRef<'a>, network: &'a Network) -> Self {
        let connections = node.connections();
        let mut owners: HashMap<String, PortOwner<'a>> = HashMap::new();
        let mut incident: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (i, conn) in connections.iter().enumerate() {
            incident.entry(conn.source_id.as_str()).or_default().push(i);
            if conn.target_id != conn.source_id {
                incident.entry(conn.target_id.as_str()).or_default().push(i);
            }
        }

        for endpoint in incident.keys() {
            if let Some((cable_id, fiber)) = parse_fiber_port(endpoint) {
                if let Some(cable) = network.cable(cable_id) {
                    owners.insert(endpoint.to_string(), PortOwner::CableFiber { cable, fiber });
                }
            }
        }
        for fusion in node.fusions() {
            for side in [FusionSide::A, FusionSide::B] {
                owners
                    .entry(fusion_port_id(&fusion.id, side))
                    .or_insert(PortOwner::Fusion { fusion, side });
            }
        }
        for splitter in node.splitters() {
            for (index, port) in splitter.output_port_ids.iter().enumerate() {
                owners
                    .entry(port.clone())
                    .or_insert(PortOwner::SplitterOutput { splitter, index });
            }
        }
        for olt in node.olts() {
            for (index, port) in olt.port_ids.iter().enumerate() {
                owners
                    .entry(port.clone())
                    .or_insert(PortOwner::OltPort { olt, index });
            }
        }
        for dio in node.dios() {
            for (index, port) in dio.port_ids.iter().enumerate() {
                owners
                    .entry(port.clone())
                    .or_insert(PortOwner::DioPort { dio, index });
            }
        }
        for splitter in node.splitters() {
            owners
                .entry(splitter.input_port_id.clone())
                .or_insert(PortOwner::SplitterInput { splitter });
        }

        Self {
            node,
            owners,
            incident,
        }
    }

    pub fn owner(&self, port: &str) -> Option<PortOwner<'a>> {
        self.owners.get(port).copied()
    }

    /// Connections touching `port`, in connection order.
    pub fn incident(&self, port: &str) -> impl Iterator<Item = &'a Connection> + '_ {
        let connections = self.node.connections();
        self.incident
            .get(port)
            .into_iter()
            .flatten()
            .map(move |&i| &connections[i])
    }

    pub fn degree(&self, port: &str) -> usize {
        self.incident.get(port).map_or(0, Vec::len)
    }

    /// Pick the edge feeding `port`, skipping the edge id in `exclude`.
    ///
    /// Edges drawn towards the port (`target == port`) are preferred over
    /// edges drawn away from it; within each group connection order decides.
    pub fn feeding_edge(&self, port: &str, exclude: Option<&str>) -> Option<FeedingEdge<'a>> {
        let eligible: Vec<&'a Connection> = self
            .incident(port)
            .filter(|c| exclude != Some(c.id.as_str()))
            .collect();
        let connection = eligible
            .iter()
            .find(|c| c.target_id == port)
            .or_else(|| eligible.iter().find(|c| c.source_id == port))
            .copied()?;
        let upstream = connection.other_end(port)?;
        Some(FeedingEdge {
            connection,
            upstream,
            candidates: eligible.len(),
        })
    }
}

//! Data-integrity checks over a node's connection graph.
//!
//! None of these stop a trace; they explain why a trace may have taken a
//! surprising turn (an arbitrary tie-break, a DIO that leads nowhere).

use super::{FusionSide, PortIndex, PortOwner, fusion_port_id};
use crate::model::{Network, NodeRef};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityIssue {
    /// A non-DIO port is an endpoint of several connections.
    #[serde(rename_all = "camelCase")]
    PortReused { port_id: String, connection_ids: Vec<String> },
    /// A DIO port should be touched by exactly one edge on each side.
    #[serde(rename_all = "camelCase")]
    DioPortEdgeCount { port_id: String, count: usize },
    /// A connection endpoint that no element of the node (or cable) owns.
    #[serde(rename_all = "camelCase")]
    DanglingEndpoint { port_id: String, connection_id: String },
    #[serde(rename_all = "camelCase")]
    SelfLoop { connection_id: String },
    /// The same port id is declared by more than one splitter/fusion/OLT/DIO slot.
    #[serde(rename_all = "camelCase")]
    DuplicatePortId { port_id: String },
    /// A fiber index at or beyond the cable's fiber count.
    #[serde(rename_all = "camelCase")]
    FiberOutOfRange { port_id: String, fiber_count: u32 },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::PortReused {
                port_id,
                connection_ids,
            } => write!(
                f,
                "port {} is used by {} connections ({})",
                port_id,
                connection_ids.len(),
                connection_ids.join(", ")
            ),
            IntegrityIssue::DioPortEdgeCount { port_id, count } => {
                write!(f, "DIO port {} has {} connections, expected 2", port_id, count)
            }
            IntegrityIssue::DanglingEndpoint {
                port_id,
                connection_id,
            } => write!(
                f,
                "connection {} ends at unknown port {}",
                connection_id, port_id
            ),
            IntegrityIssue::SelfLoop { connection_id } => {
                write!(f, "connection {} connects a port to itself", connection_id)
            }
            IntegrityIssue::DuplicatePortId { port_id } => {
                write!(f, "port id {} is declared more than once", port_id)
            }
            IntegrityIssue::FiberOutOfRange {
                port_id,
                fiber_count,
            } => write!(
                f,
                "fiber port {} is beyond the cable's {} fibers",
                port_id, fiber_count
            ),
        }
    }
}

/// Issues found in one node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    pub node_id: String,
    pub issues: Vec<IntegrityIssue>,
}

fn declared_ports(node: NodeRef<'_>) -> Vec<String> {
    let mut ports = Vec::new();
    for s in node.splitters() {
        ports.push(s.input_port_id.clone());
        ports.extend(s.output_port_ids.iter().cloned());
    }
    for f in node.fusions() {
        ports.push(fusion_port_id(&f.id, FusionSide::A));
        ports.push(fusion_port_id(&f.id, FusionSide::B));
    }
    for o in node.olts() {
        ports.extend(o.port_ids.iter().cloned());
    }
    for d in node.dios() {
        ports.extend(d.port_ids.iter().cloned());
    }
    ports
}

/// Check one node. Issues are ordered by kind, then by first appearance.
pub fn check_node(node: NodeRef<'_>, network: &Network) -> Vec<IntegrityIssue> {
    let index = PortIndex::build(node, network);
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for port in declared_ports(node) {
        if !seen.insert(port.clone()) && reported.insert(port.clone()) {
            issues.push(IntegrityIssue::DuplicatePortId { port_id: port });
        }
    }

    let mut visited = HashSet::new();
    for conn in node.connections() {
        if conn.source_id == conn.target_id {
            issues.push(IntegrityIssue::SelfLoop {
                connection_id: conn.id.clone(),
            });
        }
        let ends = [conn.source_id.as_str(), conn.target_id.as_str()];
        let ends = if ends[0] == ends[1] { &ends[..1] } else { &ends[..] };
        for &port in ends {
            match index.owner(port) {
                None => issues.push(IntegrityIssue::DanglingEndpoint {
                    port_id: port.to_string(),
                    connection_id: conn.id.clone(),
                }),
                Some(owner) => {
                    if !visited.insert(port) {
                        continue;
                    }
                    let degree = index.degree(port);
                    match owner {
                        PortOwner::DioPort { .. } => {
                            if degree != 2 {
                                issues.push(IntegrityIssue::DioPortEdgeCount {
                                    port_id: port.to_string(),
                                    count: degree,
                                });
                            }
                        }
                        PortOwner::CableFiber { cable, fiber } => {
                            if cable.fiber_count > 0 && fiber >= cable.fiber_count {
                                issues.push(IntegrityIssue::FiberOutOfRange {
                                    port_id: port.to_string(),
                                    fiber_count: cable.fiber_count,
                                });
                            }
                            if degree > 1 {
                                issues.push(reused(&index, port));
                            }
                        }
                        _ => {
                            if degree > 1 {
                                issues.push(reused(&index, port));
                            }
                        }
                    }
                }
            }
        }
    }

    issues.sort_by_key(issue_rank);
    issues
}

fn reused(index: &PortIndex<'_>, port: &str) -> IntegrityIssue {
    IntegrityIssue::PortReused {
        port_id: port.to_string(),
        connection_ids: index.incident(port).map(|c| c.id.clone()).collect(),
    }
}

fn issue_rank(issue: &IntegrityIssue) -> u8 {
    match issue {
        IntegrityIssue::DuplicatePortId { .. } => 0,
        IntegrityIssue::SelfLoop { .. } => 1,
        IntegrityIssue::DanglingEndpoint { .. } => 2,
        IntegrityIssue::PortReused { .. } => 3,
        IntegrityIssue::DioPortEdgeCount { .. } => 4,
        IntegrityIssue::FiberOutOfRange { .. } => 5,
    }
}

/// Check every node of the network, skipping nodes without issues.
pub fn check_network(network: &Network) -> Vec<NodeReport> {
    network
        .nodes()
        .filter_map(|node| {
            let issues = check_node(node, network);
            (!issues.is_empty()).then(|| NodeReport {
                node_id: node.id().to_string(),
                issues,
            })
        })
        .collect()
}

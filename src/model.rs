use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Network – read-only snapshot handed to the tracer
// ────────────────────────────────────────────────────────────────────────────

/// All boxes, points of presence and cables of a planning project.
///
/// Each collection is keyed by element id and keeps the order in which the
/// elements were stored, so audits and integrity reports are deterministic.
/// On the wire the collections are plain arrays (see [`NetworkDoc`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "NetworkDoc", into = "NetworkDoc")]
pub struct Network {
    pub boxes: IndexMap<String, SpliceBox>,
    pub pops: IndexMap<String, Pop>,
    pub cables: IndexMap<String, Cable>,
}

/// Array form of a [`Network`] as persisted by the editor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDoc {
    #[serde(default)]
    pub boxes: Vec<SpliceBox>,
    #[serde(default)]
    pub pops: Vec<Pop>,
    #[serde(default)]
    pub cables: Vec<Cable>,
}

impl From<NetworkDoc> for Network {
    fn from(doc: NetworkDoc) -> Self {
        Network::from_parts(doc.boxes, doc.pops, doc.cables)
    }
}

impl From<Network> for NetworkDoc {
    fn from(net: Network) -> Self {
        NetworkDoc {
            boxes: net.boxes.into_values().collect(),
            pops: net.pops.into_values().collect(),
            cables: net.cables.into_values().collect(),
        }
    }
}

impl Network {
    /// Build a network from element lists. A later element with a duplicate
    /// id replaces the earlier one in place.
    pub fn from_parts(
        boxes: impl IntoIterator<Item = SpliceBox>,
        pops: impl IntoIterator<Item = Pop>,
        cables: impl IntoIterator<Item = Cable>,
    ) -> Self {
        Self {
            boxes: boxes.into_iter().map(|b| (b.id.clone(), b)).collect(),
            pops: pops.into_iter().map(|p| (p.id.clone(), p)).collect(),
            cables: cables.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Resolve a node id to a box or a point of presence. Boxes win when both
    /// collections carry the same id.
    pub fn node(&self, id: &str) -> Option<NodeRef<'_>> {
        if let Some(b) = self.boxes.get(id) {
            return Some(NodeRef::Box(b));
        }
        self.pops.get(id).map(NodeRef::Pop)
    }

    pub fn cable(&self, id: &str) -> Option<&Cable> {
        self.cables.get(id)
    }

    /// Iterate over every node, boxes first.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.boxes
            .values()
            .map(NodeRef::Box)
            .chain(self.pops.values().map(NodeRef::Pop))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Nodes
// ────────────────────────────────────────────────────────────────────────────

/// A splice enclosure (CTO/CEO) holding splitters and fusion points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpliceBox {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub splitters: Vec<Splitter>,
    #[serde(default)]
    pub fusions: Vec<FusionPoint>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Cables physically entering the box.
    #[serde(default)]
    pub input_cable_ids: Vec<String>,
}

impl SpliceBox {
    pub fn splitter(&self, id: &str) -> Option<&Splitter> {
        self.splitters.iter().find(|s| s.id == id)
    }
}

/// A point of presence: the head end carrying OLTs and patch panels.
/// Most have no splitters; those cannot be traced from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pop {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub splitters: Vec<Splitter>,
    #[serde(default)]
    pub olts: Vec<Olt>,
    #[serde(default)]
    pub dios: Vec<Dio>,
    #[serde(default)]
    pub fusions: Vec<FusionPoint>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub input_cable_ids: Vec<String>,
}

/// Borrowed view over either kind of node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Box(&'a SpliceBox),
    Pop(&'a Pop),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            NodeRef::Box(b) => &b.id,
            NodeRef::Pop(p) => &p.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Box(b) => &b.name,
            NodeRef::Pop(p) => &p.name,
        }
    }

    pub fn connections(&self) -> &'a [Connection] {
        match self {
            NodeRef::Box(b) => &b.connections,
            NodeRef::Pop(p) => &p.connections,
        }
    }

    pub fn fusions(&self) -> &'a [FusionPoint] {
        match self {
            NodeRef::Box(b) => &b.fusions,
            NodeRef::Pop(p) => &p.fusions,
        }
    }

    pub fn splitters(&self) -> &'a [Splitter] {
        match self {
            NodeRef::Box(b) => &b.splitters,
            NodeRef::Pop(p) => &p.splitters,
        }
    }

    pub fn splitter(&self, id: &str) -> Option<&'a Splitter> {
        self.splitters().iter().find(|s| s.id == id)
    }

    pub fn olts(&self) -> &'a [Olt] {
        match self {
            NodeRef::Box(_) => &[],
            NodeRef::Pop(p) => &p.olts,
        }
    }

    pub fn dios(&self) -> &'a [Dio] {
        match self {
            NodeRef::Box(_) => &[],
            NodeRef::Pop(p) => &p.dios,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Elements inside nodes
// ────────────────────────────────────────────────────────────────────────────

/// A 1:N passive splitter. Port ids are explicit, never derived from `id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Splitter {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Catalog type label, e.g. `"1:8"` or `"Splitter 1x8 PLC"`.
    #[serde(rename = "type", default)]
    pub splitter_type: String,
    #[serde(default)]
    pub catalog_id: Option<String>,
    pub input_port_id: String,
    #[serde(default)]
    pub output_port_ids: Vec<String>,
}

impl Splitter {
    pub fn ratio(&self) -> usize {
        self.output_port_ids.len()
    }

    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(n) if !n.trim().is_empty() => n,
            _ if !self.splitter_type.trim().is_empty() => &self.splitter_type,
            _ => &self.id,
        }
    }
}

/// A two-port splice. Its ports are `<id>-a` and `<id>-b`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionPoint {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Preferred: direct reference into the fusion catalog.
    #[serde(default)]
    pub catalog_id: Option<String>,
    /// Legacy free-text fusion type name.
    #[serde(rename = "type", default)]
    pub fusion_type: Option<String>,
}

impl FusionPoint {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Optical line terminal. Only present inside a point of presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Olt {
    pub id: String,
    pub name: String,
    /// Flat port list, slot-major.
    #[serde(default)]
    pub port_ids: Vec<String>,
    #[serde(default)]
    pub structure: Option<OltStructure>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OltStructure {
    pub slots: u32,
    pub ports_per_slot: u32,
}

impl Olt {
    /// 1-based `(slot, port)` of the port at `index` in the flat port list.
    /// Without a structure (or with zero ports per slot) every port sits in slot 1.
    pub fn slot_port(&self, index: usize) -> (u32, u32) {
        let per_slot = self
            .structure
            .map(|s| s.ports_per_slot as usize)
            .filter(|n| *n > 0);
        match per_slot {
            Some(n) => ((index / n) as u32 + 1, (index % n) as u32 + 1),
            None => (1, index as u32 + 1),
        }
    }
}

/// Patch panel. Modelled as a fixed-loss pass-through on a single port id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dio {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port_ids: Vec<String>,
}

/// Undirected edge between two port ids. `source`/`target` only record the
/// direction the edge was drawn in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
}

impl Connection {
    /// The far end of this edge as seen from `port`, if the edge touches it.
    pub fn other_end(&self, port: &str) -> Option<&str> {
        if self.target_id == port {
            Some(&self.source_id)
        } else if self.source_id == port {
            Some(&self.target_id)
        } else {
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cables
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A multi-fiber cable drawn on the map. Fiber `n` is addressed as
/// `<id>-fiber-<n>` in both end nodes' connection graphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cable {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fiber_count: u32,
    #[serde(default)]
    pub coordinates: Vec<LatLng>,
    #[serde(default)]
    pub from_node_id: Option<String>,
    #[serde(default)]
    pub to_node_id: Option<String>,
    #[serde(default)]
    pub catalog_id: Option<String>,
}

impl Cable {
    /// The endpoint opposite `node_id`, or `None` when the cable is not
    /// anchored at `node_id` (or the opposite end is unset).
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.from_node_id.as_deref() == Some(node_id) {
            self.to_node_id.as_deref()
        } else if self.to_node_id.as_deref() == Some(node_id) {
            self.from_node_id.as_deref()
        } else {
            None
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

//! Snapshot codec: the save/load exchange format.
//!
//! A snapshot captures the whole graph plus the identity counter, as the
//! JSON record the editor's save dialog writes and its load dialog reads
//! back:
//!
//! ```json
//! {
//!     "nodes": [
//!         { "id": "root", "text": "", "label": "root",
//!           "position": { "x": 0.0, "y": 0.0 } }
//!     ],
//!     "edges": [
//!         { "source": "root", "target": "n1" }
//!     ],
//!     "nextId": 2
//! }
//! ```
//!
//! Element order carries no meaning: structural equivalence, witnessed
//! by [`Snapshot::fingerprint`], is defined over the sorted node set,
//! the sorted edge-pair multiset, and the counter.
//! Unknown extra fields on a node are carried opaquely so documents from
//! newer writers survive a decode/encode round-trip.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use xxhash_rust::xxh64::xxh64;

use crate::store::GraphStore;
use crate::types::{Node, NodeId, Position};
use crate::SNAPSHOT_SCHEMA_VERSION;

/// Error type for snapshot decoding and import.
#[derive(Debug)]
pub enum SnapshotError {
    /// An edge references a node id that is not in the snapshot.
    DanglingEdge {
        /// The edge's source id.
        source: NodeId,
        /// The edge's target id.
        target: NodeId,
    },
    /// The same node id appears more than once.
    DuplicateNode(NodeId),
    /// The document is not shaped like a snapshot.
    Json(serde_json::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::DanglingEdge { source, target } => {
                write!(f, "edge references missing node: {source} -> {target}")
            }
            SnapshotError::DuplicateNode(id) => {
                write!(f, "duplicate node id in snapshot: {id}")
            }
            SnapshotError::Json(err) => {
                write!(f, "invalid snapshot document: {err}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err)
    }
}

/// One node record in the exchange format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// Node identity.
    pub id: NodeId,
    /// Text fragment.
    pub text: String,
    /// Display label.
    pub label: String,
    /// Canvas position, if the editor placed the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields from newer writers, preserved through round-trips.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One edge record: endpoint pair only, no serial.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotEdge {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
}

/// Serialized form of an entire graph plus its identity counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All nodes.
    pub nodes: Vec<SnapshotNode>,
    /// All edges, as `(source, target)` pairs.
    pub edges: Vec<SnapshotEdge>,
    /// Identity counter to resume minting from.
    #[serde(rename = "nextId")]
    pub next_id: u64,
}

impl Snapshot {
    /// Capture the full state of `store`.
    pub fn export(store: &GraphStore) -> Self {
        let nodes = store
            .nodes()
            .map(|node| SnapshotNode {
                id: node.id.clone(),
                text: node.text.clone(),
                label: node.label.clone(),
                position: node.position,
                extra: BTreeMap::new(),
            })
            .collect();
        let edges = store
            .edges()
            .map(|edge| SnapshotEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
            })
            .collect();

        Self {
            nodes,
            edges,
            next_id: store.next_id(),
        }
    }

    /// Rebuild a store wholesale from this snapshot, replacing nothing in
    /// place: the caller swaps the returned store for its old one.
    ///
    /// Edge serials are re-minted in document order and the revision
    /// counter starts fresh; the identity counter resumes from
    /// [`Snapshot::next_id`].
    pub fn import(&self) -> Result<GraphStore, SnapshotError> {
        let mut store = GraphStore::new();

        for record in &self.nodes {
            let mut node =
                Node::new(record.id.clone(), record.text.clone()).with_label(record.label.clone());
            node.position = record.position;
            store
                .insert_node(node)
                .map_err(|_| SnapshotError::DuplicateNode(record.id.clone()))?;
        }

        for record in &self.edges {
            store
                .add_edge(record.source.clone(), record.target.clone())
                .map_err(|_| SnapshotError::DanglingEdge {
                    source: record.source.clone(),
                    target: record.target.clone(),
                })?;
        }

        store.restore_counters(self.next_id);
        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            next_id = self.next_id,
            "imported snapshot"
        );
        Ok(store)
    }

    /// Encode as pretty-printed JSON, as the save dialog writes it.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot document.
    pub fn from_json(document: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Order-independent structural fingerprint.
    ///
    /// Hashes (xxh64) the canonical bytes of the sorted node list, the
    /// sorted edge-pair multiset, the identity counter, and the schema
    /// version. Snapshots of structurally equivalent graphs fingerprint
    /// identically regardless of element order; opaque extra fields are
    /// not part of the structure and do not contribute.
    pub fn fingerprint(&self) -> u64 {
        let mut nodes: Vec<CanonicalNode<'_>> = self
            .nodes
            .iter()
            .map(|node| CanonicalNode {
                id: &node.id,
                text: &node.text,
                label: &node.label,
                position: node.position,
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(b.id));

        let mut edges: Vec<&SnapshotEdge> = self.edges.iter().collect();
        edges.sort();

        let canonical = (SNAPSHOT_SCHEMA_VERSION, nodes, edges, self.next_id);
        let bytes = serde_json::to_vec(&canonical).expect("canonical serialization failed");
        xxh64(&bytes, 0)
    }
}

/// Canonical projection of a node for fingerprinting: structural fields
/// only, borrowed, hashed in sorted-id order.
#[derive(Serialize)]
struct CanonicalNode<'a> {
    id: &'a NodeId,
    text: &'a str,
    label: &'a str,
    position: Option<Position>,
}

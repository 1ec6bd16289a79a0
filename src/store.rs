//! In-memory graph store owning nodes and edges.
//!
//! The store is an arena indexed by stable ids: nodes own their data,
//! edges reference their endpoints by id, and the mutation primitives
//! keep every cross-reference consistent (removing a node cascades to
//! all incident edges). `BTreeMap` arenas give every accessor a
//! deterministic iteration order.
//!
//! ## Ownership and concurrency
//!
//! A `GraphStore` is exclusively owned by its caller and provides no
//! internal locking. The editing surface is a single logical writer;
//! callers must serialize mutations against compose/export calls (one
//! compose in flight at a time).

use std::collections::BTreeMap;

use crate::types::{Edge, EdgeId, Node, NodeId, Position};

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Operation referenced a node id that is not present.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
    /// Operation referenced an edge id that is not present.
    #[error("edge not found: {0}")]
    EdgeNotFound(EdgeId),
    /// A caller-supplied node id collided with an existing node.
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),
}

/// Arena of nodes and edges with identity allocation.
///
/// All graph state lives here: the node and edge maps, the adjacency
/// indexes derived from them, the identity counter minting node ids, and
/// the revision counter the editor polls to schedule redraws.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Nodes by id.
    nodes: BTreeMap<NodeId, Node>,
    /// Edges by serial.
    edges: BTreeMap<EdgeId, Edge>,
    /// Source -> outgoing edge serials, in insertion order (duplicates kept).
    outgoing: BTreeMap<NodeId, Vec<EdgeId>>,
    /// Target -> incoming edge serials, in insertion order.
    incoming: BTreeMap<NodeId, Vec<EdgeId>>,
    /// Monotonic counter minting `n{counter}` node ids. Persisted in
    /// snapshots; never decremented.
    next_id: u64,
    /// Serial source for edge ids. Ephemeral: restarts on import.
    next_edge_serial: u64,
    /// Bumped on every successful mutation.
    revision: u64,
}

impl GraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    ///
    /// With `id` omitted, an id is minted from the identity counter,
    /// skipping over any ids already taken by explicit inserts. A
    /// supplied `id` never advances the counter and fails with
    /// [`StoreError::DuplicateId`] if already present.
    pub fn add_node(
        &mut self,
        id: Option<NodeId>,
        text: impl Into<String>,
        position: Option<Position>,
    ) -> Result<NodeId, StoreError> {
        let id = match id {
            Some(id) => id,
            None => loop {
                let candidate = NodeId::minted(self.next_id);
                self.next_id += 1;
                if !self.nodes.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let mut node = Node::new(id.clone(), text);
        node.position = position;
        self.insert_node(node)?;
        Ok(id)
    }

    /// Insert a fully-formed node (used by snapshot import).
    pub(crate) fn insert_node(&mut self, node: Node) -> Result<(), StoreError> {
        if self.nodes.contains_key(&node.id) {
            return Err(StoreError::DuplicateId(node.id));
        }
        tracing::trace!(node = %node.id, "add node");
        self.nodes.insert(node.id.clone(), node);
        self.touch();
        Ok(())
    }

    /// Remove a node and cascade removal of all incident edges, in both
    /// directions. Returns the removed node.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, StoreError> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.clone()))?;

        let mut incident: Vec<EdgeId> = self.outgoing.remove(id).unwrap_or_default();
        incident.extend(self.incoming.remove(id).unwrap_or_default());
        // Self-loops appear in both adjacency lists.
        incident.sort_unstable();
        incident.dedup();

        for edge_id in &incident {
            if let Some(edge) = self.edges.remove(edge_id) {
                Self::unlink(&mut self.outgoing, &edge.source, *edge_id);
                Self::unlink(&mut self.incoming, &edge.target, *edge_id);
            }
        }

        tracing::trace!(node = %id, cascaded = incident.len(), "remove node");
        self.touch();
        Ok(node)
    }

    /// Add a directed edge. Self-loops are permitted; parallel duplicates
    /// between the same ordered pair are kept as distinct edges.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId, StoreError> {
        if !self.nodes.contains_key(&source) {
            return Err(StoreError::NodeNotFound(source));
        }
        if !self.nodes.contains_key(&target) {
            return Err(StoreError::NodeNotFound(target));
        }

        let id = EdgeId::new(self.next_edge_serial);
        self.next_edge_serial += 1;

        self.outgoing.entry(source.clone()).or_default().push(id);
        self.incoming.entry(target.clone()).or_default().push(id);
        tracing::trace!(edge = %id, from = %source, to = %target, "add edge");
        self.edges.insert(id, Edge::new(id, source, target));
        self.touch();
        Ok(id)
    }

    /// Remove an edge. Returns the removed edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, StoreError> {
        let edge = self.edges.remove(&id).ok_or(StoreError::EdgeNotFound(id))?;
        Self::unlink(&mut self.outgoing, &edge.source, id);
        Self::unlink(&mut self.incoming, &edge.target, id);
        tracing::trace!(edge = %id, "remove edge");
        self.touch();
        Ok(edge)
    }

    /// Replace a node's text fragment.
    pub fn set_node_text(&mut self, id: &NodeId, text: impl Into<String>) -> Result<(), StoreError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.clone()))?;
        node.text = text.into();
        self.touch();
        Ok(())
    }

    /// Replace a node's canvas position.
    pub fn set_node_position(
        &mut self,
        id: &NodeId,
        position: Option<Position>,
    ) -> Result<(), StoreError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.clone()))?;
        node.position = position;
        self.touch();
        Ok(())
    }

    /// Look up a node.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Whether a node id is present.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node ids, in order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Look up an edge by serial.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// All edges, in serial (insertion) order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Outgoing edges of a node, in insertion order. Parallel duplicates
    /// are yielded once each.
    pub fn outgoing<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Edge> {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|edge_id| self.edges.get(edge_id))
    }

    /// Count of edges whose target is this node.
    pub fn indegree(&self, id: &NodeId) -> usize {
        self.incoming.get(id).map_or(0, Vec::len)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current value of the identity counter (the next minted serial).
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Revision counter: bumped by every successful mutation so the
    /// editor knows a redraw is needed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Restore the identity counter and reset the revision, after a
    /// snapshot import has replayed all nodes and edges.
    pub(crate) fn restore_counters(&mut self, next_id: u64) {
        self.next_id = next_id;
        self.revision = 0;
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn unlink(index: &mut BTreeMap<NodeId, Vec<EdgeId>>, node: &NodeId, id: EdgeId) {
        if let Some(serials) = index.get_mut(node) {
            serials.retain(|&serial| serial != id);
            if serials.is_empty() {
                index.remove(node);
            }
        }
    }
}

//! Edge types for the fragment graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// Identifier for a single edge instance.
///
/// Serials are minted by the store in insertion order and are not
/// persisted: the exchange format identifies edges by their
/// `(source, target)` pair, so serials are re-minted on import. Parallel
/// duplicates between the same ordered pair stay distinct through their
/// serials and act as independent random choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u64);

impl EdgeId {
    pub(crate) fn new(serial: u64) -> Self {
        Self(serial)
    }

    /// The raw serial value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Directed edge in the fragment graph: a possible continuation from
/// source to target.
///
/// References its endpoints by id; it does not own them. Implements
/// `Ord` for canonical ordering: `(source, target, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Edge serial.
    pub id: EdgeId,
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
}

impl Edge {
    pub(crate) fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self { id, source, target }
    }

    /// Whether the edge loops back onto its own source.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// Canonical ordering: source, then target, then serial.
impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.source.cmp(&other.source) {
            std::cmp::Ordering::Equal => match self.target.cmp(&other.target) {
                std::cmp::Ordering::Equal => self.id.cmp(&other.id),
                ord => ord,
            },
            ord => ord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(serial: u64, source: &str, target: &str) -> Edge {
        Edge::new(EdgeId::new(serial), NodeId::from(source), NodeId::from(target))
    }

    #[test]
    fn test_edge_ordering() {
        let e1 = edge(0, "a", "b");
        let e2 = edge(1, "a", "c");
        let e3 = edge(2, "b", "c");

        // Same source, different target
        assert!(e1 < e2);
        // Different source
        assert!(e1 < e3);
        assert!(e2 < e3);
    }

    #[test]
    fn test_parallel_edges_stay_distinct() {
        let e1 = edge(0, "a", "b");
        let e2 = edge(1, "a", "b");

        assert_ne!(e1, e2);
        assert!(e1 < e2);
    }

    #[test]
    fn test_self_loop() {
        assert!(edge(0, "a", "a").is_self_loop());
        assert!(!edge(0, "a", "b").is_self_loop());
    }
}

//! Node types for the fragment graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node in the fragment graph.
///
/// Wraps the editor-assigned id string (`root`, `n0`, `n1`, ...) and
/// implements `Ord` for deterministic ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from an arbitrary id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id minted from the identity counter (`n0`, `n1`, ...).
    pub(crate) fn minted(serial: u64) -> Self {
        Self(format!("n{serial}"))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 2D canvas position. Opaque to the engine: stored and round-tripped
/// for the editor, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal canvas coordinate.
    pub x: f64,
    /// Vertical canvas coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A vertex of the fragment graph.
///
/// Owns its text fragment and display metadata. Edges refer to nodes by
/// id only; nodes themselves are owned exclusively by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Text fragment appended to a walk when the node is visited. May be
    /// empty.
    pub text: String,
    /// Display label. Defaults to the id string at creation.
    pub label: String,
    /// Optional canvas position, passed through unchanged.
    pub position: Option<Position>,
}

impl Node {
    /// Create a node with the label derived from its id.
    pub fn new(id: NodeId, text: impl Into<String>) -> Self {
        let label = id.to_string();
        Self {
            id,
            text: text.into(),
            label,
            position: None,
        }
    }

    /// Set an explicit display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the canvas position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_ordering() {
        let a = NodeId::from("n1");
        let b = NodeId::from("n2");
        assert!(a < b);
    }

    #[test]
    fn test_minted_id_format() {
        assert_eq!(NodeId::minted(7).as_str(), "n7");
    }

    #[test]
    fn test_label_defaults_to_id() {
        let node = Node::new(NodeId::from("root"), "");
        assert_eq!(node.label, "root");

        let labeled = Node::new(NodeId::from("n3"), "x").with_label("intro");
        assert_eq!(labeled.label, "intro");
    }

    #[test]
    fn test_node_id_serializes_transparently() {
        let json = serde_json::to_string(&NodeId::from("n5")).unwrap();
        assert_eq!(json, "\"n5\"");
    }
}

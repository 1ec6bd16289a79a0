//! Composition output types.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Separator between per-walk strings in [`Composition::text`].
///
/// Fragments concatenate with no separator inside a walk; distinct walks
/// are joined with a blank line.
pub const WALK_SEPARATOR: &str = "\n\n";

/// Result of one compose request.
///
/// `text` joins the per-walk fragment strings with [`WALK_SEPARATOR`];
/// `paths` records the visited node ids of each walk, in walk order, for
/// optional highlighting by the editor. Both are ephemeral: recomputed
/// on every request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// The composed output text.
    pub text: String,
    /// One ordered node-id sequence per walk.
    pub paths: Vec<Vec<NodeId>>,
}

impl Composition {
    /// Number of walks that contributed to the text.
    pub fn walk_count(&self) -> usize {
        self.paths.len()
    }

    /// Whether the compose pass produced no walks (empty graph).
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

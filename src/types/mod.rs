//! Core types for the composition engine.

pub mod composition;
pub mod edge;
pub mod node;

pub use composition::{Composition, WALK_SEPARATOR};
pub use edge::{Edge, EdgeId};
pub use node::{Node, NodeId, Position};

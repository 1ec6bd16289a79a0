//! # compose-kernel
//!
//! Stochastic text composition over directed fragment graphs.
//!
//! A user authors a directed graph whose nodes each hold a text fragment
//! and whose edges denote possible continuations. The engine answers one
//! question:
//!
//! > Given the authored graph, what text does one randomized,
//! > cycle-safe traversal of it produce?
//!
//! ## Core Contract
//!
//! 1. Partition the graph into weakly-connected components
//! 2. Walk each component once per entry point: every indegree-0 node,
//!    or a single randomly chosen member when no indegree-0 node exists
//! 3. Within a walk, never revisit a node (cycles and self-loops are
//!    safe by construction); concatenate visited fragments in order
//! 4. Join the per-walk strings with a blank line and return them with
//!    the visited paths for highlighting
//!
//! ## Architecture
//!
//! ```text
//! editor mutations → GraphStore → analyze → Composer → Composition
//!                        ↓
//!                    Snapshot (save / load)
//! ```
//!
//! ## Concurrency
//!
//! Single-writer, single-reader-at-a-time: the store has no internal
//! locking and callers serialize mutations against compose and export
//! calls. Nothing in the crate blocks on I/O; the only non-determinism
//! is the injected [`Picker`] choice source.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
pub mod composer;
pub mod pick;
pub mod snapshot;
pub mod store;
pub mod types;

// Re-exports
pub use components::{analyze, Component, GraphAnalysis};
pub use composer::{replay_text, Composer};
pub use pick::{Picker, ScriptedPicker, ThreadRngPicker};
pub use snapshot::{Snapshot, SnapshotEdge, SnapshotError, SnapshotNode};
pub use store::{GraphStore, StoreError};
pub use types::{Composition, Edge, EdgeId, Node, NodeId, Position, WALK_SEPARATOR};

/// Schema version for the snapshot exchange format.
/// Increment on breaking changes to the serialized shape.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";

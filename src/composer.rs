//! Randomized cycle-safe composition walks.
//!
//! One compose pass walks every entry point the connectivity analysis
//! found: one walk per indegree-0 node in components that have them, one
//! walk from a uniformly chosen member in components that do not. Within
//! a walk a node is never visited twice, which bounds the walk to its
//! component's size and makes self-loops and cycles safe by
//! construction.
//!
//! ## Algorithm (per walk)
//!
//! 1. Append the current node's fragment; record its id in the path
//! 2. Collect outgoing edges whose target is unvisited in this walk
//!    (parallel duplicates count separately)
//! 3. Pick one uniformly via the injected [`Picker`] and move, or
//!    terminate when no candidate remains

use std::collections::BTreeSet;

use crate::components::{analyze, GraphAnalysis};
use crate::pick::{Picker, ThreadRngPicker};
use crate::store::GraphStore;
use crate::types::{Composition, Edge, NodeId, WALK_SEPARATOR};

/// Traversal engine producing compositions from a graph.
///
/// Holds only the injected uniform-choice source; the store and analysis
/// are passed per call, so one composer can serve many graphs.
#[derive(Debug, Clone, Default)]
pub struct Composer<P = ThreadRngPicker> {
    picker: P,
}

impl Composer<ThreadRngPicker> {
    /// Composer drawing choices from the thread RNG.
    pub fn new() -> Self {
        Self {
            picker: ThreadRngPicker,
        }
    }
}

impl<P: Picker> Composer<P> {
    /// Composer with an injected choice source.
    pub fn with_picker(picker: P) -> Self {
        Self { picker }
    }

    /// Compose the whole graph: analyze connectivity, then walk every
    /// entry point. An empty store yields an empty composition.
    pub fn compose(&mut self, store: &GraphStore) -> Composition {
        let analysis = analyze(store);
        self.compose_with(store, &analysis)
    }

    /// Compose against a precomputed analysis.
    ///
    /// The analysis must describe the store's current revision; callers
    /// serialize mutations against compose calls.
    pub fn compose_with(&mut self, store: &GraphStore, analysis: &GraphAnalysis) -> Composition {
        let mut texts: Vec<String> = Vec::new();
        let mut paths: Vec<Vec<NodeId>> = Vec::new();

        for component in &analysis.components {
            if component.nodes.is_empty() {
                continue;
            }
            if component.is_sourceless() {
                // No natural start: one walk from a uniformly chosen member.
                let entry = &component.nodes[self.picker.pick(component.nodes.len())];
                tracing::debug!(size = component.len(), entry = %entry, "source-less component");
                let (text, path) = self.walk(store, entry);
                texts.push(text);
                paths.push(path);
            } else {
                for entry in &component.sources {
                    let (text, path) = self.walk(store, entry);
                    texts.push(text);
                    paths.push(path);
                }
            }
        }

        tracing::debug!(walks = paths.len(), "composed");
        Composition {
            text: texts.join(WALK_SEPARATOR),
            paths,
        }
    }

    /// One walk: follow random outgoing edges until every continuation
    /// leads somewhere already visited, or nowhere at all.
    fn walk(&mut self, store: &GraphStore, entry: &NodeId) -> (String, Vec<NodeId>) {
        let mut text = String::new();
        let mut path: Vec<NodeId> = Vec::new();
        let mut visited: BTreeSet<NodeId> = BTreeSet::new();
        let mut current = entry.clone();

        while let Some(node) = store.node(&current) {
            visited.insert(current.clone());
            text.push_str(&node.text);
            path.push(current.clone());

            let candidates: Vec<&Edge> = store
                .outgoing(&current)
                .filter(|edge| !visited.contains(&edge.target))
                .collect();
            if candidates.is_empty() {
                break;
            }

            let edge = candidates[self.picker.pick(candidates.len())];
            tracing::trace!(edge = %edge.id, to = %edge.target, "follow");
            current = edge.target.clone();
        }

        (text, path)
    }
}

/// Re-derive the fragment text of a captured walk path.
///
/// Replay of a returned path is deterministic once captured. Returns
/// `None` when the path references a node no longer present (the path
/// was captured against an older revision).
pub fn replay_text(store: &GraphStore, path: &[NodeId]) -> Option<String> {
    let mut text = String::new();
    for id in path {
        text.push_str(&store.node(id)?.text);
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pick::ScriptedPicker;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn store_with(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> GraphStore {
        let mut store = GraphStore::new();
        for (n, text) in nodes {
            store.add_node(Some(id(n)), *text, None).unwrap();
        }
        for (s, t) in edges {
            store.add_edge(id(s), id(t)).unwrap();
        }
        store
    }

    #[test]
    fn test_empty_graph_composes_empty() {
        let mut composer = Composer::new();
        let composition = composer.compose(&GraphStore::new());

        assert_eq!(composition.text, "");
        assert!(composition.is_empty());
    }

    #[test]
    fn test_linear_walk_concatenates_in_order() {
        let store = store_with(
            &[("a", "one "), ("b", "two "), ("c", "three")],
            &[("a", "b"), ("b", "c")],
        );
        let mut composer = Composer::with_picker(ScriptedPicker::first());
        let composition = composer.compose(&store);

        assert_eq!(composition.text, "one two three");
        assert_eq!(composition.paths, vec![vec![id("a"), id("b"), id("c")]]);
    }

    #[test]
    fn test_branch_choice_follows_picker() {
        let store = store_with(
            &[("a", "a"), ("b", "b"), ("c", "c")],
            &[("a", "b"), ("a", "c")],
        );

        let mut first = Composer::with_picker(ScriptedPicker::first());
        assert_eq!(first.compose(&store).text, "ab");

        let mut second = Composer::with_picker(ScriptedPicker::new([1]));
        assert_eq!(second.compose(&store).text, "ac");
    }

    #[test]
    fn test_self_loop_visits_once() {
        let store = store_with(&[("a", "x")], &[("a", "a")]);
        let mut composer = Composer::new();
        let composition = composer.compose(&store);

        assert_eq!(composition.text, "x");
        assert_eq!(composition.paths, vec![vec![id("a")]]);
    }

    #[test]
    fn test_cycle_walk_never_repeats() {
        let store = store_with(&[("a", "x"), ("b", "y")], &[("a", "b"), ("b", "a")]);
        let mut composer = Composer::new();

        for _ in 0..50 {
            let composition = composer.compose(&store);
            assert_eq!(composition.walk_count(), 1);
            assert!(composition.text == "xy" || composition.text == "yx");
            assert_eq!(composition.paths[0].len(), 2);
        }
    }

    #[test]
    fn test_duplicate_edges_are_distinct_candidates() {
        // Two parallel a->b edges and one a->c: candidate order is
        // insertion order, so index 1 is the duplicate a->b.
        let store = store_with(
            &[("a", "a"), ("b", "b"), ("c", "c")],
            &[("a", "b"), ("a", "b"), ("a", "c")],
        );

        let mut composer = Composer::with_picker(ScriptedPicker::new([1]));
        assert_eq!(composer.compose(&store).text, "ab");

        let mut composer = Composer::with_picker(ScriptedPicker::new([2]));
        assert_eq!(composer.compose(&store).text, "ac");
    }

    #[test]
    fn test_dead_end_when_all_targets_visited() {
        // a -> b -> a plus b -> c: every node has an incoming edge, so
        // the component is source-less and walked once. From b, once a
        // is visited only c remains, and c is a dead end.
        let store = store_with(
            &[("a", "1"), ("b", "2"), ("c", "3")],
            &[("a", "b"), ("b", "a"), ("b", "c")],
        );
        let mut composer = Composer::with_picker(ScriptedPicker::first());
        let composition = composer.compose(&store);

        assert_eq!(composition.walk_count(), 1);
        assert_eq!(composition.text, "123");
        let path = &composition.paths[0];
        let unique: BTreeSet<&NodeId> = path.iter().collect();
        assert_eq!(unique.len(), path.len());
    }

    #[test]
    fn test_walks_joined_with_separator() {
        let store = store_with(&[("a", "left"), ("z", "right")], &[]);
        let mut composer = Composer::with_picker(ScriptedPicker::first());
        let composition = composer.compose(&store);

        assert_eq!(composition.text, format!("left{WALK_SEPARATOR}right"));
        assert_eq!(composition.walk_count(), 2);
    }

    #[test]
    fn test_replay_text_matches_walk() {
        let store = store_with(
            &[("a", "foo"), ("b", "bar")],
            &[("a", "b")],
        );
        let mut composer = Composer::new();
        let composition = composer.compose(&store);

        let replayed = replay_text(&store, &composition.paths[0]).unwrap();
        assert_eq!(replayed, composition.text);
    }

    #[test]
    fn test_replay_text_missing_node() {
        let store = store_with(&[("a", "foo")], &[]);
        assert!(replay_text(&store, &[id("a"), id("gone")]).is_none());
    }

    #[test]
    fn test_empty_fragments_compose_empty_text() {
        let store = store_with(&[("a", ""), ("b", "")], &[("a", "b")]);
        let mut composer = Composer::new();
        let composition = composer.compose(&store);

        assert_eq!(composition.text, "");
        assert_eq!(composition.paths[0].len(), 2);
    }
}

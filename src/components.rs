//! Connectivity analysis for the fragment graph.
//!
//! Partitions the node set into weakly-connected components (edges
//! treated as undirected for grouping, since a walk may legitimately
//! start anywhere reachable) and classifies each component's candidate
//! entry points. The analysis is fully deterministic; the one random
//! step in a compose pass (picking a fallback entry for a source-less
//! component) belongs to the composer.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::store::GraphStore;
use crate::types::NodeId;

/// One weakly-connected component of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Member node ids, sorted.
    pub nodes: Vec<NodeId>,
    /// Members with directed indegree 0, sorted.
    ///
    /// Empty exactly when every member has an incoming edge (the
    /// component is entirely cyclic); the composer then walks once from
    /// a uniformly chosen member instead.
    pub sources: Vec<NodeId>,
}

impl Component {
    /// Number of member nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the component has no members.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the component has no natural start node.
    pub fn is_sourceless(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whether the component contains the given node.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.binary_search(id).is_ok()
    }
}

/// Result of partitioning a graph into components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphAnalysis {
    /// Components, ordered by their smallest member id.
    pub components: Vec<Component>,
}

impl GraphAnalysis {
    /// Number of components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of walks a compose pass over this analysis will produce:
    /// one per source, or exactly one for a source-less component.
    pub fn walk_count(&self) -> usize {
        self.components
            .iter()
            .map(|component| component.sources.len().max(1))
            .sum()
    }

    /// The component containing the given node, if any.
    pub fn component_of(&self, id: &NodeId) -> Option<&Component> {
        self.components.iter().find(|component| component.contains(id))
    }
}

/// Partition `store` into weakly-connected components and classify each
/// component's entry points.
///
/// ## Algorithm
///
/// 1. Build an undirected adjacency view of the edge set
/// 2. Flood breadth-first from each not-yet-seen node, in id order
/// 3. Collect each component's indegree-0 members as its sources
///
/// Iteration follows the store's id ordering throughout, so components
/// come out sorted by their smallest member id, with members and sources
/// sorted within each component. Indegree is taken from the full
/// directed graph; this equals the indegree restricted to the component
/// because every edge lies inside exactly one weak component.
pub fn analyze(store: &GraphStore) -> GraphAnalysis {
    let mut undirected: BTreeMap<&NodeId, BTreeSet<&NodeId>> = BTreeMap::new();
    for edge in store.edges() {
        undirected.entry(&edge.source).or_default().insert(&edge.target);
        undirected.entry(&edge.target).or_default().insert(&edge.source);
    }

    let mut seen: BTreeSet<&NodeId> = BTreeSet::new();
    let mut components: Vec<Component> = Vec::new();

    // The first unseen node in id order is its component's smallest
    // member, so the output is already ordered by smallest member.
    for start in store.node_ids() {
        if seen.contains(start) {
            continue;
        }
        seen.insert(start);

        let mut members: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<&NodeId> = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            members.push(current.clone());
            if let Some(neighbors) = undirected.get(current) {
                for &next in neighbors {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        members.sort();
        let sources: Vec<NodeId> = members
            .iter()
            .filter(|member| store.indegree(member) == 0)
            .cloned()
            .collect();

        components.push(Component { nodes: members, sources });
    }

    tracing::debug!(
        components = components.len(),
        nodes = store.node_count(),
        "analyzed graph"
    );
    GraphAnalysis { components }
}

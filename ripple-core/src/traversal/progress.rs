//! Progress snapshots delivered to observers after each traversal step.

use std::collections::BTreeSet;

use crate::graph::{Link, NodeId};

/// Immutable view of the traversal state after a step.
///
/// # Examples
/// ```
/// use ripple_core::{Graph, NodeId, NodeState, TraversalEngine};
/// use std::sync::Arc;
///
/// let graph = Arc::new(Graph::from_links(2, &[(0, 1)]).expect("links are valid"));
/// let mut engine = TraversalEngine::new(graph);
/// let progress = engine.step();
/// assert_eq!(progress.step(), 1);
/// assert_eq!(progress.node_state(NodeId::new(0)), NodeState::Visited);
/// assert_eq!(progress.node_state(NodeId::new(1)), NodeState::Frontier);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Progress {
    step: usize,
    frontier: BTreeSet<NodeId>,
    visited: BTreeSet<NodeId>,
}

impl Progress {
    pub(crate) const fn new(
        step: usize,
        frontier: BTreeSet<NodeId>,
        visited: BTreeSet<NodeId>,
    ) -> Self {
        Self {
            step,
            frontier,
            visited,
        }
    }

    /// Number of non-empty steps completed when the snapshot was taken.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Nodes due to be visited on the next step.
    #[must_use]
    pub const fn frontier(&self) -> &BTreeSet<NodeId> {
        &self.frontier
    }

    /// Nodes already reached by the spread.
    #[must_use]
    pub const fn visited(&self) -> &BTreeSet<NodeId> {
        &self.visited
    }

    /// Returns `true` once the spread can make no further progress.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Classifies a node for display.
    #[must_use]
    pub fn node_state(&self, id: NodeId) -> NodeState {
        if self.visited.contains(&id) {
            NodeState::Visited
        } else if self.frontier.contains(&id) {
            NodeState::Frontier
        } else {
            NodeState::Idle
        }
    }

    /// Classifies a link for display.
    ///
    /// A link is spreading while one endpoint has been visited and the other
    /// waits in the frontier. Otherwise it counts as visited once either
    /// endpoint has been visited.
    #[must_use]
    pub fn link_state(&self, link: &Link) -> LinkState {
        let source = self.node_state(link.source());
        let target = self.node_state(link.target());
        match (source, target) {
            (NodeState::Visited, NodeState::Frontier) | (NodeState::Frontier, NodeState::Visited) => {
                LinkState::Spreading
            }
            (NodeState::Visited, _) | (_, NodeState::Visited) => LinkState::Visited,
            _ => LinkState::Idle,
        }
    }

    /// Aggregates the snapshot against a graph of `node_count` nodes.
    #[must_use]
    pub fn summary(&self, node_count: usize) -> SpreadSummary {
        SpreadSummary {
            nodes: node_count,
            visited: self.visited.len(),
            frontier: self.frontier.len(),
            unreached: node_count.saturating_sub(self.visited.len() + self.frontier.len()),
            steps: self.step,
        }
    }
}

/// Display classification of a node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeState {
    /// Not yet reached.
    Idle,
    /// Queued for the next step.
    Frontier,
    /// Already reached.
    Visited,
}

/// Display classification of a link.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LinkState {
    /// Neither endpoint has been reached.
    Idle,
    /// The spread is crossing this link on the next step.
    Spreading,
    /// At least one endpoint has been reached.
    Visited,
}

/// Node counts describing how far a spread has progressed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SpreadSummary {
    /// Total number of nodes in the graph.
    pub nodes: usize,
    /// Nodes already visited.
    pub visited: usize,
    /// Nodes waiting in the frontier.
    pub frontier: usize,
    /// Nodes neither visited nor queued.
    pub unreached: usize,
    /// Non-empty steps completed.
    pub steps: usize,
}

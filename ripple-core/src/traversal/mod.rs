//! Level-synchronous spread over a fixed graph.
//!
//! The engine keeps two disjoint sets: `visited` holds nodes the spread has
//! already reached and `frontier` holds nodes due to be visited on the next
//! step. Each [`TraversalEngine::step`] visits the whole frontier at once and
//! replaces it with the unvisited neighbours it discovered, so one step
//! advances the spread by exactly one BFS level.

mod observer;
mod progress;

use std::{collections::BTreeSet, sync::Arc};

use tracing::{debug, info};

use crate::graph::{Graph, NodeId};

pub use self::{
    observer::{ChannelObserver, ProgressObserver, Subscribers, SubscriptionId},
    progress::{LinkState, NodeState, Progress, SpreadSummary},
};

/// Traversal state for one run, seeded at [`NodeId::SEED`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ripple_core::{Graph, NodeId, TraversalEngine};
///
/// let graph = Arc::new(Graph::from_links(3, &[(0, 1), (1, 2)]).expect("links are valid"));
/// let mut engine = TraversalEngine::new(graph);
/// while !engine.is_exhausted() {
///     engine.step();
/// }
/// assert_eq!(engine.visited().len(), 3);
/// assert_eq!(engine.steps_taken(), 3);
/// ```
#[derive(Debug)]
pub struct TraversalEngine<P = ()> {
    graph: Arc<Graph<P>>,
    frontier: BTreeSet<NodeId>,
    visited: BTreeSet<NodeId>,
    steps: usize,
    subscribers: Subscribers,
}

impl<P> TraversalEngine<P> {
    /// Creates an engine whose frontier holds only the seed node.
    #[must_use]
    pub fn new(graph: Arc<Graph<P>>) -> Self {
        Self::with_subscribers(graph, Subscribers::default())
    }

    /// Creates a seeded engine that notifies an existing observer registry.
    ///
    /// Used on restart so observers survive the replacement of the engine.
    #[must_use]
    pub fn with_subscribers(graph: Arc<Graph<P>>, subscribers: Subscribers) -> Self {
        let mut engine = Self {
            graph,
            frontier: BTreeSet::new(),
            visited: BTreeSet::new(),
            steps: 0,
            subscribers,
        };
        engine.reseed();
        engine
    }

    /// Graph the spread runs over.
    #[must_use]
    pub fn graph(&self) -> &Arc<Graph<P>> {
        &self.graph
    }

    /// Nodes due to be visited on the next step.
    #[must_use]
    pub const fn frontier(&self) -> &BTreeSet<NodeId> {
        &self.frontier
    }

    /// Nodes already reached.
    #[must_use]
    pub const fn visited(&self) -> &BTreeSet<NodeId> {
        &self.visited
    }

    /// Number of steps that visited at least one node.
    #[must_use]
    pub const fn steps_taken(&self) -> usize {
        self.steps
    }

    /// Returns `true` when the frontier is empty and stepping is a no-op.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Copies the current state into a [`Progress`] snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Progress {
        Progress::new(self.steps, self.frontier.clone(), self.visited.clone())
    }

    /// Summarises the current state against the whole graph.
    #[must_use]
    pub fn summary(&self) -> SpreadSummary {
        self.snapshot().summary(self.graph.len())
    }

    /// Advances the spread by one level and notifies every observer.
    ///
    /// Every frontier node is marked visited. Each of its neighbours that is
    /// neither visited nor in the current frontier is staged once for the next
    /// frontier, which then replaces the current one in a single assignment.
    /// On an empty frontier the call changes nothing.
    pub fn step(&mut self) -> Progress {
        if !self.frontier.is_empty() {
            let mut staged = BTreeSet::new();
            for &id in &self.frontier {
                self.visited.insert(id);
                staged.extend(
                    self.graph
                        .neighbours(id)
                        .iter()
                        .copied()
                        .filter(|next| {
                            !self.visited.contains(next) && !self.frontier.contains(next)
                        }),
                );
            }
            self.frontier = staged;
            self.steps += 1;
            debug!(
                step = self.steps,
                frontier = self.frontier.len(),
                visited = self.visited.len(),
                "spread advanced"
            );
            if self.frontier.is_empty() {
                info!(
                    steps = self.steps,
                    visited = self.visited.len(),
                    unreached = self.graph.len() - self.visited.len(),
                    "spread exhausted"
                );
            }
        }

        let progress = self.snapshot();
        self.subscribers.notify(&progress);
        progress
    }

    /// Clears both `visited` and `frontier`.
    ///
    /// The engine is left empty rather than reseeded, so later steps are
    /// no-ops. Call [`TraversalEngine::reseed`] or build a new engine to start
    /// over.
    pub fn reset(&mut self) {
        self.visited.clear();
        self.frontier.clear();
        self.steps = 0;
    }

    /// Clears all progress and seeds the frontier with [`NodeId::SEED`].
    pub fn reseed(&mut self) {
        self.reset();
        if self.graph.node(NodeId::SEED).is_some() {
            self.frontier.insert(NodeId::SEED);
        }
    }

    /// Registers an observer notified after every step.
    pub fn subscribe(&mut self, observer: impl ProgressObserver + 'static) -> SubscriptionId {
        self.subscribers.subscribe(observer)
    }

    /// Removes a previously registered observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Number of registered observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Detaches the observer registry, leaving this engine with none.
    pub fn take_subscribers(&mut self) -> Subscribers {
        std::mem::take(&mut self.subscribers)
    }
}

//! Undirected graph model shared by the generator and the traversal engine.
//!
//! A [`Graph`] is built once per run and never mutated afterwards. Neighbour
//! lists and the link list are kept consistent: every [`Link`] `(a, b)` has
//! `b` in the neighbour list of `a` and `a` in the neighbour list of `b`.

mod generate;

use std::{collections::HashSet, fmt};

use crate::{Result, error::RippleError};

pub use self::generate::{generate, generate_with_rng};

/// Identifier of a node, dense in `[0, node_count)`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    /// The node every spread is seeded from.
    pub const SEED: Self = Self(0);

    /// Wraps a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex with its neighbour list and a consumer-owned payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<P = ()> {
    id: NodeId,
    conn: Vec<NodeId>,
    payload: P,
}

impl<P> Node<P> {
    /// Identifier of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Neighbours in the order their links were created.
    #[must_use]
    pub fn neighbours(&self) -> &[NodeId] {
        &self.conn
    }

    /// Number of neighbours.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.conn.len()
    }

    /// Consumer payload attached to this node.
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }
}

/// An undirected link between two distinct nodes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Link {
    source: NodeId,
    target: NodeId,
}

impl Link {
    /// Endpoint that initiated the link during generation.
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }

    /// Endpoint that accepted the link during generation.
    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Returns `true` when `id` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

/// Immutable node set and derived link set for one run.
///
/// # Examples
/// ```
/// use ripple_core::{Graph, NodeId};
///
/// let graph = Graph::from_links(3, &[(0, 1), (1, 2)]).expect("links are valid");
/// assert_eq!(graph.len(), 3);
/// assert_eq!(graph.neighbours(NodeId::new(1)), &[NodeId::new(0), NodeId::new(2)]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph<P = ()> {
    nodes: Vec<Node<P>>,
    links: Vec<Link>,
}

impl Graph {
    /// Builds a graph from explicit links, validating every endpoint.
    ///
    /// Used for fixtures and for consumers that supply their own topology
    /// instead of a generated one.
    ///
    /// # Errors
    /// Returns [`RippleError::InvalidNodeCount`] for an empty graph,
    /// [`RippleError::InvalidLink`] for out-of-range endpoints or self-loops
    /// and [`RippleError::DuplicateLink`] when a pair is linked twice.
    pub fn from_links(node_count: usize, links: &[(usize, usize)]) -> Result<Self> {
        if node_count == 0 {
            return Err(RippleError::InvalidNodeCount { got: node_count });
        }
        let mut adjacency = Adjacency::new(node_count);
        let mut seen = HashSet::with_capacity(links.len());
        for &(source_id, target_id) in links {
            if source_id == target_id || source_id >= node_count || target_id >= node_count {
                return Err(RippleError::InvalidLink {
                    source_id,
                    target_id,
                    nodes: node_count,
                });
            }
            let key = (source_id.min(target_id), source_id.max(target_id));
            if !seen.insert(key) {
                return Err(RippleError::DuplicateLink {
                    source_id,
                    target_id,
                });
            }
            adjacency.link(NodeId(source_id), NodeId(target_id));
        }
        Ok(adjacency.into_graph())
    }
}

impl<P> Graph<P> {
    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for graphs produced by this crate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in id order.
    #[must_use]
    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }

    /// All links in creation order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(id.get())
    }

    /// Neighbours of `id`, or an empty slice when the id is unknown.
    #[must_use]
    pub fn neighbours(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[][..], Node::neighbours)
    }

    /// Number of neighbours of `id`.
    #[must_use]
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbours(id).len()
    }

    /// Nodes without any neighbour. They can never be reached by a spread
    /// unless they are the seed.
    pub fn isolated(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.conn.is_empty())
            .map(Node::id)
    }

    /// Replaces every payload, keeping the topology untouched.
    ///
    /// # Examples
    /// ```
    /// use ripple_core::{Graph, NodeId};
    ///
    /// let graph = Graph::from_links(2, &[(0, 1)])
    ///     .expect("links are valid")
    ///     .map_payload(|node| format!("node-{}", node.id()));
    /// let node = graph.node(NodeId::new(1)).expect("node exists");
    /// assert_eq!(node.payload(), "node-1");
    /// ```
    #[must_use]
    pub fn map_payload<Q>(self, mut f: impl FnMut(&Node<P>) -> Q) -> Graph<Q> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| {
                let payload = f(&node);
                Node {
                    id: node.id,
                    conn: node.conn,
                    payload,
                }
            })
            .collect();
        Graph {
            nodes,
            links: self.links,
        }
    }
}

/// Mutable adjacency used while a graph is under construction.
#[derive(Debug)]
struct Adjacency {
    conn: Vec<Vec<NodeId>>,
    links: Vec<Link>,
}

impl Adjacency {
    fn new(node_count: usize) -> Self {
        Self {
            conn: vec![Vec::new(); node_count],
            links: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.conn.len()
    }

    fn degree(&self, id: NodeId) -> usize {
        self.conn.get(id.get()).map_or(0, Vec::len)
    }

    fn contains(&self, id: NodeId, neighbour: NodeId) -> bool {
        self.conn
            .get(id.get())
            .is_some_and(|conn| conn.contains(&neighbour))
    }

    /// Records a symmetric link. Callers guarantee distinct, in-range, not yet
    /// linked endpoints.
    fn link(&mut self, source: NodeId, target: NodeId) {
        if let Some(conn) = self.conn.get_mut(source.get()) {
            conn.push(target);
        }
        if let Some(conn) = self.conn.get_mut(target.get()) {
            conn.push(source);
        }
        self.links.push(Link { source, target });
    }

    fn into_graph(self) -> Graph {
        let nodes = self
            .conn
            .into_iter()
            .enumerate()
            .map(|(index, conn)| Node {
                id: NodeId(index),
                conn,
                payload: (),
            })
            .collect();
        Graph {
            nodes,
            links: self.links,
        }
    }
}

#[cfg(test)]
mod tests;

//! Random graph generation under a per-node degree cap.
//!
//! Nodes are visited in id order. Each node below the cap requests a random
//! number of extra links and draws a uniformly random partner for each one.
//! A partner that is already at the cap drops the attempt outright, so some
//! nodes finish below the cap and small graphs may end up disconnected.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{Span, debug, field, instrument};

use crate::{Result, error::RippleError};

use super::{Adjacency, Graph, NodeId};

/// Generates a random graph of `node_count` nodes using OS entropy.
///
/// # Errors
/// Returns [`RippleError::InvalidNodeCount`] when `node_count` is zero and
/// [`RippleError::InvalidMaxDegree`] when `max_degree` is zero.
///
/// # Examples
/// ```
/// use ripple_core::generate;
///
/// let graph = generate(1, 3).expect("parameters are valid");
/// assert_eq!(graph.len(), 1);
/// assert!(graph.links().is_empty());
/// ```
pub fn generate(node_count: usize, max_degree: usize) -> Result<Graph> {
    generate_with_rng(node_count, max_degree, &mut SmallRng::from_entropy())
}

/// Generates a random graph drawing every choice from `rng`.
///
/// The same seed always yields the same graph.
///
/// # Errors
/// Returns [`RippleError::InvalidNodeCount`] when `node_count` is zero and
/// [`RippleError::InvalidMaxDegree`] when `max_degree` is zero.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use ripple_core::generate_with_rng;
///
/// let first = generate_with_rng(50, 3, &mut SmallRng::seed_from_u64(7))
///     .expect("parameters are valid");
/// let second = generate_with_rng(50, 3, &mut SmallRng::seed_from_u64(7))
///     .expect("parameters are valid");
/// assert_eq!(first, second);
/// assert!(first.nodes().iter().all(|node| node.degree() <= 3));
/// ```
#[instrument(
    name = "core.generate",
    err,
    skip(rng),
    fields(links = field::Empty, dropped = field::Empty),
)]
pub fn generate_with_rng<R: Rng + ?Sized>(
    node_count: usize,
    max_degree: usize,
    rng: &mut R,
) -> Result<Graph> {
    if node_count == 0 {
        return Err(RippleError::InvalidNodeCount { got: node_count });
    }
    if max_degree == 0 {
        return Err(RippleError::InvalidMaxDegree { got: max_degree });
    }

    let mut adjacency = Adjacency::new(node_count);
    let mut dropped = 0_usize;
    for index in 0..node_count {
        let id = NodeId::new(index);
        let degree = adjacency.degree(id);
        if degree >= max_degree {
            continue;
        }
        let attempts = rng.gen_range(1..=max_degree - degree);
        for _ in 0..attempts {
            let Some(candidate) = draw_candidate(&adjacency, id, rng) else {
                break;
            };
            if adjacency.degree(candidate) >= max_degree {
                dropped += 1;
                continue;
            }
            adjacency.link(id, candidate);
        }
    }

    let graph = adjacency.into_graph();
    let span = Span::current();
    span.record("links", graph.links().len());
    span.record("dropped", dropped);
    debug!(
        isolated = graph.isolated().count(),
        "graph generation completed"
    );
    Ok(graph)
}

/// Draws a uniformly random node that is neither `id` nor one of its current
/// neighbours, or `None` once `id` is adjacent to every other node.
fn draw_candidate<R: Rng + ?Sized>(
    adjacency: &Adjacency,
    id: NodeId,
    rng: &mut R,
) -> Option<NodeId> {
    if adjacency.degree(id) + 1 >= adjacency.len() {
        return None;
    }
    loop {
        let candidate = NodeId::new(rng.gen_range(0..adjacency.len()));
        if candidate != id && !adjacency.contains(id, candidate) {
            return Some(candidate);
        }
    }
}

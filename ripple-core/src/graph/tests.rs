//! Unit and property tests for graph construction and generation.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::VecDeque;

use rand::{RngCore, SeedableRng, rngs::SmallRng};
use rstest::rstest;
use tracing_subscriber::layer::SubscriberExt;

use ripple_test_support::tracing::RecordingLayer;

use crate::test_utils::suite_proptest_config;
use crate::{Graph, NodeId, RippleError, generate, generate_with_rng};

fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Checks symmetry, the degree cap, self-loop freedom, neighbour uniqueness
/// and link/neighbour agreement for a generated graph.
fn check_structure(graph: &Graph, max_degree: usize) -> Result<(), TestCaseError> {
    for node in graph.nodes() {
        prop_assert!(
            node.degree() <= max_degree,
            "node {} has degree {} above cap {max_degree}",
            node.id(),
            node.degree(),
        );
        prop_assert!(
            !node.neighbours().contains(&node.id()),
            "node {} links to itself",
            node.id(),
        );
        for (position, neighbour) in node.neighbours().iter().enumerate() {
            prop_assert!(
                !node.neighbours()[position + 1..].contains(neighbour),
                "node {} lists neighbour {neighbour} twice",
                node.id(),
            );
            prop_assert!(
                graph.neighbours(*neighbour).contains(&node.id()),
                "link {} -> {neighbour} is not symmetric",
                node.id(),
            );
        }
    }
    let degree_sum: usize = graph.nodes().iter().map(|node| node.degree()).sum();
    prop_assert_eq!(degree_sum, graph.links().len() * 2);
    for link in graph.links() {
        prop_assert!(link.source() != link.target());
        prop_assert!(graph.neighbours(link.source()).contains(&link.target()));
    }
    Ok(())
}

#[rstest]
fn single_node_graph_has_no_links() {
    let graph = generate(1, 3).expect("one node is valid");
    assert_eq!(graph.len(), 1);
    assert!(graph.links().is_empty());
    assert_eq!(graph.isolated().collect::<Vec<_>>(), vec![NodeId::SEED]);
}

#[rstest]
#[case::no_nodes(0, 3, "RIPPLE_INVALID_NODE_COUNT")]
#[case::no_degree(10, 0, "RIPPLE_INVALID_MAX_DEGREE")]
fn generate_rejects_degenerate_parameters(
    #[case] nodes: usize,
    #[case] max_degree: usize,
    #[case] code: &str,
) {
    let err = generate(nodes, max_degree).expect_err("parameters must be rejected");
    assert_eq!(err.code().as_str(), code);
}

#[rstest]
#[case::pair(2, 3)]
#[case::triangle(3, 3)]
#[case::complete_four(4, 3)]
#[case::tight_cap(4, 5)]
fn generate_terminates_when_candidates_run_out(#[case] nodes: usize, #[case] max_degree: usize) {
    let graph = generate_with_rng(nodes, max_degree, &mut seeded(11))
        .expect("parameters are valid");
    assert_eq!(graph.len(), nodes);
    assert!(graph.nodes().iter().all(|node| node.degree() < nodes));
}

#[rstest]
fn first_node_always_requests_a_link() {
    for seed in 0..32 {
        let graph = generate_with_rng(20, 3, &mut seeded(seed)).expect("parameters are valid");
        assert!(graph.degree(NodeId::SEED) >= 1, "seed {seed} left node 0 isolated");
    }
}

#[rstest]
fn default_sized_graphs_respect_the_cap() {
    let graph = generate_with_rng(100, 3, &mut seeded(2024)).expect("parameters are valid");
    assert!(graph.nodes().iter().all(|node| node.degree() <= 3));
    assert!(!graph.links().is_empty());
}

#[rstest]
fn generation_is_recorded_in_a_span() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let graph = tracing::subscriber::with_default(subscriber, || {
        generate_with_rng(30, 3, &mut seeded(5))
    })
    .expect("parameters are valid");

    let span = layer
        .span_named("core.generate")
        .expect("core.generate span must exist");
    assert_eq!(span.field("node_count"), Some("30"));
    assert_eq!(span.field("max_degree"), Some("3"));
    assert_eq!(
        span.field("links"),
        Some(graph.links().len().to_string().as_str())
    );
    assert!(span.field("dropped").is_some());
}

/// Replays a fixed sequence of raw words and panics if asked for more.
struct ScriptedRng {
    words: VecDeque<u64>,
}

impl ScriptedRng {
    fn new(words: impl IntoIterator<Item = u64>) -> Self {
        Self {
            words: words.into_iter().collect(),
        }
    }

    fn remaining(&self) -> usize {
        self.words.len()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        u32::try_from(self.next_u64() >> 32).expect("upper half fits in u32")
    }

    fn next_u64(&mut self) -> u64 {
        self.words
            .pop_front()
            .expect("generator drew more values than were scripted")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Raw word for which rand's widening-multiply range sampler yields offset
/// `k` within a range of `len` values.
fn word_for(k: u64, len: u64) -> u64 {
    let scaled = (u128::from(k) << 64).div_ceil(u128::from(len));
    u64::try_from(scaled).expect("k is below len")
}

#[rstest]
fn attempts_towards_a_full_partner_are_dropped_without_redrawing() {
    // Four nodes, cap 1. Every node requests one link (range of one value).
    // Node 0 takes node 1; node 1 is then full and skipped. Node 2 draws
    // node 0 and node 3 draws node 1, both already at the cap.
    let one_attempt = word_for(0, 1);
    let mut rng = ScriptedRng::new([
        one_attempt,
        word_for(1, 4),
        one_attempt,
        word_for(0, 4),
        one_attempt,
        word_for(1, 4),
    ]);
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let graph = tracing::subscriber::with_default(subscriber, || {
        generate_with_rng(4, 1, &mut rng)
    })
    .expect("parameters are valid");

    assert_eq!(rng.remaining(), 0, "every scripted draw is consumed once");
    let links: Vec<(usize, usize)> = graph
        .links()
        .iter()
        .map(|link| (link.source().get(), link.target().get()))
        .collect();
    assert_eq!(links, vec![(0, 1)]);
    assert_eq!(graph.degree(NodeId::new(2)), 0);
    assert_eq!(graph.degree(NodeId::new(3)), 0);
    assert_eq!(
        graph.isolated().collect::<Vec<_>>(),
        vec![NodeId::new(2), NodeId::new(3)]
    );

    let span = layer
        .span_named("core.generate")
        .expect("core.generate span must exist");
    assert_eq!(span.field("links"), Some("1"));
    assert_eq!(span.field("dropped"), Some("2"));
}

#[rstest]
fn each_dropped_attempt_consumes_one_of_the_requested_links() {
    // Four nodes, cap 2. Node 0 requests two links and takes 1 and 2. Node 1
    // takes 2, leaving nodes 0, 1 and 2 full. Node 3 requests two links,
    // draws 0 then 1, and both attempts are dropped.
    let mut rng = ScriptedRng::new([
        word_for(1, 2),
        word_for(1, 4),
        word_for(2, 4),
        word_for(0, 1),
        word_for(2, 4),
        word_for(1, 2),
        word_for(0, 4),
        word_for(1, 4),
    ]);
    let graph = generate_with_rng(4, 2, &mut rng).expect("parameters are valid");

    assert_eq!(rng.remaining(), 0);
    assert_eq!(graph.neighbours(NodeId::new(0)), [NodeId::new(1), NodeId::new(2)]);
    assert_eq!(graph.neighbours(NodeId::new(1)), [NodeId::new(0), NodeId::new(2)]);
    assert_eq!(graph.neighbours(NodeId::new(2)), [NodeId::new(0), NodeId::new(1)]);
    assert!(graph.neighbours(NodeId::new(3)).is_empty());
}

#[rstest]
#[case::self_loop(&[(1, 1)], "RIPPLE_INVALID_LINK")]
#[case::out_of_range(&[(0, 4)], "RIPPLE_INVALID_LINK")]
#[case::duplicate(&[(0, 1), (1, 0)], "RIPPLE_DUPLICATE_LINK")]
fn from_links_rejects_malformed_input(#[case] links: &[(usize, usize)], #[case] code: &str) {
    let err = Graph::from_links(4, links).expect_err("links must be rejected");
    assert_eq!(err.code().as_str(), code);
    assert!(!err.is_configuration());
}

#[rstest]
fn from_links_rejects_empty_graph() {
    let err = Graph::from_links(0, &[]).expect_err("empty graph must be rejected");
    assert_eq!(err, RippleError::InvalidNodeCount { got: 0 });
}

#[rstest]
fn from_links_builds_symmetric_neighbours() {
    let graph = Graph::from_links(4, &[(0, 1), (0, 2), (1, 3)]).expect("links are valid");
    assert_eq!(graph.neighbours(NodeId::new(0)), &[NodeId::new(1), NodeId::new(2)]);
    assert_eq!(graph.neighbours(NodeId::new(3)), &[NodeId::new(1)]);
    assert_eq!(graph.degree(NodeId::new(1)), 2);
    assert!(graph.neighbours(NodeId::new(9)).is_empty());
    assert!(graph.links()[2].touches(NodeId::new(3)));
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn generated_graphs_hold_structural_invariants(
        nodes in 1_usize..=120,
        max_degree in 1_usize..=6,
        seed in any::<u64>(),
    ) {
        let graph = generate_with_rng(nodes, max_degree, &mut seeded(seed))
            .map_err(|err| TestCaseError::fail(format!("generation failed: {err}")))?;
        prop_assert_eq!(graph.len(), nodes);
        check_structure(&graph, max_degree)?;
    }

    #[test]
    fn generation_is_deterministic_per_seed(
        nodes in 1_usize..=80,
        max_degree in 1_usize..=4,
        seed in any::<u64>(),
    ) {
        let first = generate_with_rng(nodes, max_degree, &mut seeded(seed))
            .map_err(|err| TestCaseError::fail(format!("generation failed: {err}")))?;
        let second = generate_with_rng(nodes, max_degree, &mut seeded(seed))
            .map_err(|err| TestCaseError::fail(format!("generation failed: {err}")))?;
        prop_assert_eq!(first, second);
    }
}

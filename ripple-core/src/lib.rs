//! Ripple core library.
//!
//! Generates a random graph under a per-node degree cap and animates a
//! breadth-first spread across it from node 0. Rendering is left to
//! consumers, which subscribe to [`Progress`] snapshots and drive playback
//! through a [`Session`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod graph;
mod playback;
mod session;
mod traversal;

#[cfg(test)]
mod test_utils;

pub use crate::{
    config::{
        DEFAULT_GRAVITY, DEFAULT_MAX_DEGREE, DEFAULT_NUM_NODES, DEFAULT_SPEED, GRAVITY_RANGE,
        NUM_NODES_RANGE, NUM_NODES_STEP, RECOGNISED_SPEEDS, SimulationConfig,
        SimulationConfigBuilder,
    },
    error::{Result, RippleError, RippleErrorCode},
    graph::{Graph, Link, Node, NodeId, generate, generate_with_rng},
    playback::{Playback, PlaybackState, TickOutcome, TickToken},
    session::{Run, Session},
    traversal::{
        ChannelObserver, LinkState, NodeState, Progress, ProgressObserver, SpreadSummary,
        Subscribers, SubscriptionId, TraversalEngine,
    },
};

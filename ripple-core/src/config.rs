//! Run configuration for the spread simulation.
//!
//! A [`SimulationConfig`] is an immutable record captured when a run starts.
//! Control surfaces never mutate it in place: they build a new record through
//! [`SimulationConfigBuilder`] and restart the session with it.

use std::{
    num::{NonZeroU32, NonZeroUsize},
    ops::RangeInclusive,
    time::Duration,
};

use crate::{Result, error::RippleError};

/// Default number of generated nodes.
pub const DEFAULT_NUM_NODES: usize = 100;
/// Node counts offered by the control surface.
pub const NUM_NODES_RANGE: RangeInclusive<usize> = 20..=500;
/// Increment used by the control surface when adjusting the node count.
pub const NUM_NODES_STEP: usize = 10;
/// Default cap on the number of neighbours per node.
pub const DEFAULT_MAX_DEGREE: usize = 3;
/// Default playback speed in steps per second.
pub const DEFAULT_SPEED: u32 = 2;
/// Playback speeds offered by the control surface.
pub const RECOGNISED_SPEEDS: [u32; 3] = [1, 2, 4];
/// Default layout gravity handed to the renderer.
pub const DEFAULT_GRAVITY: f64 = 0.15;
/// Gravity values offered by the control surface.
pub const GRAVITY_RANGE: RangeInclusive<f64> = 0.05..=0.75;

/// Validated, immutable parameters for one simulation run.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ripple_core::SimulationConfigBuilder;
///
/// let config = SimulationConfigBuilder::new()
///     .with_num_nodes(40)
///     .with_speed(4)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.num_nodes().get(), 40);
/// assert_eq!(config.step_interval(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    num_nodes: NonZeroUsize,
    max_degree: NonZeroUsize,
    speed: NonZeroU32,
    gravity: f64,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Number of nodes generated for each run.
    #[must_use]
    pub const fn num_nodes(&self) -> NonZeroUsize {
        self.num_nodes
    }

    /// Maximum number of neighbours any node may acquire.
    #[must_use]
    pub const fn max_degree(&self) -> NonZeroUsize {
        self.max_degree
    }

    /// Playback speed in steps per second.
    #[must_use]
    pub const fn speed(&self) -> NonZeroU32 {
        self.speed
    }

    /// Layout gravity. Opaque to the core; forwarded to renderers.
    #[must_use]
    pub const fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Seed for graph generation, or `None` to draw from OS entropy.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Delay between two playback ticks, `1000 / speed` milliseconds.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs(1) / self.speed.get()
    }

    /// Returns `true` when every parameter lies inside the ranges the control
    /// surface offers, with the node count on a [`NUM_NODES_STEP`] boundary.
    /// Values outside them are still valid input to the core.
    #[must_use]
    pub fn is_recognised(&self) -> bool {
        let nodes = self.num_nodes.get();
        NUM_NODES_RANGE.contains(&nodes)
            && nodes % NUM_NODES_STEP == 0
            && RECOGNISED_SPEEDS.contains(&self.speed.get())
            && GRAVITY_RANGE.contains(&self.gravity)
    }

    /// Returns a builder pre-populated with this configuration, for deriving
    /// the record used by the next restart.
    #[must_use]
    pub fn to_builder(&self) -> SimulationConfigBuilder {
        SimulationConfigBuilder {
            num_nodes: self.num_nodes.get(),
            max_degree: self.max_degree.get(),
            speed: self.speed.get(),
            gravity: self.gravity,
            seed: self.seed,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_nodes: NonZeroUsize::MIN.saturating_add(DEFAULT_NUM_NODES - 1),
            max_degree: NonZeroUsize::MIN.saturating_add(DEFAULT_MAX_DEGREE - 1),
            speed: NonZeroU32::MIN.saturating_add(DEFAULT_SPEED - 1),
            gravity: DEFAULT_GRAVITY,
            seed: None,
        }
    }
}

/// Configures and validates [`SimulationConfig`] records.
///
/// # Examples
/// ```
/// use ripple_core::{RippleError, SimulationConfigBuilder};
///
/// let err = SimulationConfigBuilder::new()
///     .with_speed(0)
///     .build()
///     .expect_err("zero speed is rejected");
/// assert!(matches!(err, RippleError::InvalidSpeed { got: 0 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfigBuilder {
    num_nodes: usize,
    max_degree: usize,
    speed: u32,
    gravity: f64,
    seed: Option<u64>,
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self {
            num_nodes: DEFAULT_NUM_NODES,
            max_degree: DEFAULT_MAX_DEGREE,
            speed: DEFAULT_SPEED,
            gravity: DEFAULT_GRAVITY,
            seed: None,
        }
    }
}

impl SimulationConfigBuilder {
    /// Creates a builder populated with the default run parameters.
    ///
    /// # Examples
    /// ```
    /// use ripple_core::SimulationConfigBuilder;
    ///
    /// let builder = SimulationConfigBuilder::new();
    /// assert_eq!(builder.num_nodes(), 100);
    /// assert_eq!(builder.max_degree(), 3);
    /// assert_eq!(builder.speed(), 2);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of generated nodes.
    #[must_use]
    pub fn with_num_nodes(mut self, num_nodes: usize) -> Self {
        self.num_nodes = num_nodes;
        self
    }

    /// Returns the configured node count.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Overrides the per-node degree cap.
    #[must_use]
    pub fn with_max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = max_degree;
        self
    }

    /// Returns the configured degree cap.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Overrides the playback speed in steps per second.
    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Returns the configured playback speed.
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Overrides the layout gravity forwarded to renderers.
    #[must_use]
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Returns the configured layout gravity.
    #[must_use]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Fixes the generator seed so restarts reproduce the same graph.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured generator seed.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the parameters and produces an immutable [`SimulationConfig`].
    ///
    /// # Errors
    /// Returns [`RippleError::InvalidNodeCount`], [`RippleError::InvalidMaxDegree`]
    /// or [`RippleError::InvalidSpeed`] when the corresponding value is zero,
    /// and [`RippleError::InvalidGravity`] when gravity is not finite.
    pub fn build(self) -> Result<SimulationConfig> {
        let num_nodes = NonZeroUsize::new(self.num_nodes).ok_or(RippleError::InvalidNodeCount {
            got: self.num_nodes,
        })?;
        let max_degree = NonZeroUsize::new(self.max_degree).ok_or(
            RippleError::InvalidMaxDegree {
                got: self.max_degree,
            },
        )?;
        let speed =
            NonZeroU32::new(self.speed).ok_or(RippleError::InvalidSpeed { got: self.speed })?;
        if !self.gravity.is_finite() {
            return Err(RippleError::InvalidGravity { got: self.gravity });
        }

        Ok(SimulationConfig {
            num_nodes,
            max_degree,
            speed,
            gravity: self.gravity,
            seed: self.seed,
        })
    }
}

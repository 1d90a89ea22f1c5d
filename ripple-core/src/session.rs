//! Run lifecycle: the command surface consumed by control panels.
//!
//! A [`Session`] owns the active [`SimulationConfig`] and the current
//! [`Run`]. Restarting tears the run down and builds a brand-new graph,
//! engine and playback; nothing but the observer registry survives. Each run
//! gets a fresh epoch so ticks scheduled by a replaced run are rejected.

use std::{sync::Arc, time::Duration};

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{info, instrument};

use crate::{
    Result,
    config::SimulationConfig,
    graph::{Graph, generate_with_rng},
    playback::{Playback, PlaybackState},
    traversal::{ProgressObserver, SpreadSummary, Subscribers, SubscriptionId, TraversalEngine},
};

/// One generated graph with its traversal engine and playback scheduler.
#[derive(Debug)]
pub struct Run {
    id: u64,
    graph: Arc<Graph>,
    engine: TraversalEngine,
    playback: Playback,
}

impl Run {
    fn assemble(
        id: u64,
        graph: Arc<Graph>,
        config: &SimulationConfig,
        subscribers: Subscribers,
    ) -> Self {
        let engine = TraversalEngine::with_subscribers(Arc::clone(&graph), subscribers);
        Self {
            id,
            graph,
            engine,
            playback: Playback::new(config.step_interval(), id),
        }
    }

    /// Monotonic run number within the owning session, starting at zero.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Graph generated for this run.
    #[must_use]
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Traversal engine for this run.
    #[must_use]
    pub const fn engine(&self) -> &TraversalEngine {
        &self.engine
    }

    /// Playback scheduler for this run.
    #[must_use]
    pub const fn playback(&self) -> &Playback {
        &self.playback
    }
}

/// Owns the configuration and the current run.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ripple_core::{PlaybackState, Session, SimulationConfigBuilder};
///
/// let config = SimulationConfigBuilder::new()
///     .with_num_nodes(30)
///     .with_seed(Some(3))
///     .build()
///     .expect("configuration is valid");
/// let mut session = Session::new(config).expect("session starts");
/// assert_eq!(session.toggle_play_pause(Duration::ZERO), PlaybackState::Running);
/// session.poll(Duration::from_secs(60));
/// assert!(session.run().engine().is_exhausted());
/// assert_eq!(session.playback_state(), PlaybackState::Paused);
/// ```
#[derive(Debug)]
pub struct Session {
    config: SimulationConfig,
    run: Run,
}

impl Session {
    /// Builds the first run for `config`.
    ///
    /// # Errors
    /// Propagates generator errors; a validated configuration never produces
    /// one.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let graph = generate_graph(&config)?;
        let run = Run::assemble(0, graph, &config, Subscribers::default());
        Ok(Self { config, run })
    }

    /// Configuration used by the current run.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The current run.
    #[must_use]
    pub const fn run(&self) -> &Run {
        &self.run
    }

    /// Identifier of the current run.
    #[must_use]
    pub const fn run_id(&self) -> u64 {
        self.run.id
    }

    /// Playback state of the current run.
    #[must_use]
    pub const fn playback_state(&self) -> PlaybackState {
        self.run.playback.state()
    }

    /// When the next tick of the current run is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.run.playback.next_deadline()
    }

    /// Progress counts of the current run.
    #[must_use]
    pub fn summary(&self) -> SpreadSummary {
        self.run.engine.summary()
    }

    /// Starts or stops playback of the current run.
    pub fn toggle_play_pause(&mut self, now: Duration) -> PlaybackState {
        let Run {
            engine, playback, ..
        } = &mut self.run;
        playback.toggle(engine, now)
    }

    /// Fires every tick due at or before `now`. Returns the number of steps.
    pub fn poll(&mut self, now: Duration) -> usize {
        let Run {
            engine, playback, ..
        } = &mut self.run;
        playback.poll(engine, now)
    }

    /// Registers an observer that follows the session across restarts.
    pub fn subscribe(&mut self, observer: impl ProgressObserver + 'static) -> SubscriptionId {
        self.run.engine.subscribe(observer)
    }

    /// Removes an observer registered through [`Session::subscribe`].
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.run.engine.unsubscribe(id)
    }

    /// Replaces the current run with a fresh one built from the current
    /// configuration.
    ///
    /// # Errors
    /// Propagates generator errors; a validated configuration never produces
    /// one.
    pub fn restart(&mut self) -> Result<()> {
        let config = self.config;
        self.replace_run(config)
    }

    /// Adopts a new configuration and restarts with it.
    ///
    /// # Errors
    /// Propagates generator errors; a validated configuration never produces
    /// one.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<()> {
        self.replace_run(config)
    }

    #[instrument(
        name = "core.restart",
        err,
        skip(self, config),
        fields(previous_run = self.run.id, nodes = config.num_nodes().get()),
    )]
    fn replace_run(&mut self, config: SimulationConfig) -> Result<()> {
        self.run.playback.pause();
        self.run.engine.reset();
        let graph = generate_graph(&config)?;
        let subscribers = self.run.engine.take_subscribers();
        let next_id = self.run.id + 1;
        self.run = Run::assemble(next_id, graph, &config, subscribers);
        self.config = config;
        info!(run = next_id, "run restarted");
        Ok(())
    }
}

fn generate_graph(config: &SimulationConfig) -> Result<Arc<Graph>> {
    let mut rng = match config.seed() {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let graph = generate_with_rng(
        config.num_nodes().get(),
        config.max_degree().get(),
        &mut rng,
    )?;
    Ok(Arc::new(graph))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    use crate::config::SimulationConfigBuilder;
    use crate::test_utils::recording_observer;

    #[fixture]
    fn config() -> SimulationConfig {
        SimulationConfigBuilder::new()
            .with_num_nodes(40)
            .with_speed(4)
            .with_seed(Some(17))
            .build()
            .expect("configuration is valid")
    }

    #[rstest]
    fn new_session_starts_paused_at_run_zero(config: SimulationConfig) {
        let session = Session::new(config).expect("session starts");
        assert_eq!(session.run_id(), 0);
        assert_eq!(session.run().playback().epoch(), 0);
        assert_eq!(session.playback_state(), PlaybackState::Paused);
        assert_eq!(session.run().graph().len(), 40);
        assert_eq!(session.summary().frontier, 1);
    }

    #[rstest]
    fn restart_replaces_the_run(config: SimulationConfig) {
        let mut session = Session::new(config).expect("session starts");
        session.toggle_play_pause(Duration::ZERO);
        session.poll(Duration::from_millis(250));
        assert!(session.summary().visited > 0);

        session.restart().expect("restart succeeds");
        assert_eq!(session.run_id(), 1);
        assert_eq!(session.playback_state(), PlaybackState::Paused);
        assert_eq!(session.run().playback().epoch(), session.run_id());
        assert!(!session.run().playback().is_running());
        assert_eq!(session.next_deadline(), None);
        assert_eq!(session.summary().visited, 0);
        assert_eq!(session.summary().frontier, 1);
    }

    #[rstest]
    fn seeded_restarts_reproduce_the_graph(config: SimulationConfig) {
        let mut session = Session::new(config).expect("session starts");
        let before = Arc::clone(session.run().graph());
        session.restart().expect("restart succeeds");
        assert!(!Arc::ptr_eq(&before, session.run().graph()));
        assert_eq!(*before, **session.run().graph());
    }

    #[rstest]
    fn ticks_from_a_replaced_run_are_rejected(config: SimulationConfig) {
        let mut session = Session::new(config).expect("session starts");
        session.toggle_play_pause(Duration::ZERO);
        let stale = session
            .run()
            .playback()
            .pending()
            .expect("a tick is pending");

        session.restart().expect("restart succeeds");
        session.toggle_play_pause(Duration::ZERO);
        let Run {
            engine, playback, ..
        } = &mut session.run;
        assert_eq!(
            playback.fire(engine, stale),
            crate::playback::TickOutcome::Stale
        );
        assert_eq!(engine.steps_taken(), 0);
    }

    #[rstest]
    fn observers_follow_the_session_across_restarts(config: SimulationConfig) {
        let mut session = Session::new(config).expect("session starts");
        let (observer, seen) = recording_observer();
        let id = session.subscribe(observer);

        session.toggle_play_pause(Duration::ZERO);
        session.poll(Duration::from_millis(250));
        session.restart().expect("restart succeeds");
        session.toggle_play_pause(Duration::ZERO);
        session.poll(Duration::from_millis(250));
        assert_eq!(seen.borrow().len(), 2);

        assert!(session.unsubscribe(id));
        session.poll(Duration::from_millis(500));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[rstest]
    fn reconfigure_adopts_the_new_record(config: SimulationConfig) {
        let mut session = Session::new(config).expect("session starts");
        let next = config
            .to_builder()
            .with_num_nodes(60)
            .with_speed(1)
            .build()
            .expect("configuration is valid");
        session.reconfigure(next).expect("reconfigure succeeds");
        assert_eq!(session.config(), &next);
        assert_eq!(session.run().graph().len(), 60);
        assert_eq!(session.run().playback().interval(), Duration::from_secs(1));
    }

    #[rstest]
    fn toggling_twice_pauses_without_stepping(config: SimulationConfig) {
        let mut session = Session::new(config).expect("session starts");
        assert_eq!(
            session.toggle_play_pause(Duration::ZERO),
            PlaybackState::Running
        );
        assert_eq!(
            session.toggle_play_pause(Duration::from_millis(10)),
            PlaybackState::Paused
        );
        assert_eq!(session.poll(Duration::from_secs(10)), 0);
    }
}

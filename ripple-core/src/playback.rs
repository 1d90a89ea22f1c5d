//! Pausable playback that steps a [`TraversalEngine`] at a fixed cadence.
//!
//! Playback is a cooperative state machine rather than a background timer.
//! The driver owns the clock: it asks for [`Playback::next_deadline`], waits
//! until then, and calls [`Playback::poll`] with the current time measured
//! from the start of the run. Every scheduled tick is named by a
//! [`TickToken`]. Pausing invalidates the outstanding token and each run gets
//! its own epoch, so a tick issued before a pause or a restart can never step
//! the engine afterwards.

use std::time::Duration;

use tracing::{debug, info};

use crate::traversal::{Progress, TraversalEngine};

/// Whether playback is currently advancing the spread.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PlaybackState {
    /// No tick is scheduled.
    #[default]
    Paused,
    /// A tick is scheduled and further ticks follow at the step interval.
    Running,
}

/// Names one scheduled tick of one playback generation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TickToken {
    epoch: u64,
    generation: u64,
    due: Duration,
}

impl TickToken {
    /// Time, measured from the start of the run, at which the tick fires.
    #[must_use]
    pub const fn due(&self) -> Duration {
        self.due
    }
}

/// Result of presenting a [`TickToken`] to [`Playback::fire`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TickOutcome {
    /// The engine advanced by one step.
    Stepped(Progress),
    /// The token belonged to a cancelled tick or to another run.
    Stale,
}

/// Cadence-driven scheduler for one run.
///
/// # Examples
/// ```
/// use std::{sync::Arc, time::Duration};
/// use ripple_core::{Graph, Playback, PlaybackState, TraversalEngine};
///
/// let graph = Arc::new(Graph::from_links(3, &[(0, 1), (1, 2)]).expect("links are valid"));
/// let mut engine = TraversalEngine::new(graph);
/// let mut playback = Playback::new(Duration::from_millis(500), 0);
///
/// assert_eq!(playback.toggle(&engine, Duration::ZERO), PlaybackState::Running);
/// assert_eq!(playback.next_deadline(), Some(Duration::from_millis(500)));
/// assert_eq!(playback.poll(&mut engine, Duration::from_secs(2)), 3);
/// assert!(engine.is_exhausted());
/// assert_eq!(playback.state(), PlaybackState::Paused);
/// ```
#[derive(Debug)]
pub struct Playback {
    interval: Duration,
    epoch: u64,
    generation: u64,
    state: PlaybackState,
    pending: Option<TickToken>,
    ticks_fired: u64,
}

impl Playback {
    /// Creates a paused scheduler firing every `interval` once started.
    ///
    /// `epoch` identifies the run the scheduler belongs to; tokens from a
    /// scheduler with a different epoch are always rejected.
    #[must_use]
    pub const fn new(interval: Duration, epoch: u64) -> Self {
        Self {
            interval,
            epoch,
            generation: 0,
            state: PlaybackState::Paused,
            pending: None,
            ticks_fired: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns `true` while running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Delay between two ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run this scheduler belongs to.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of ticks that stepped the engine.
    #[must_use]
    pub const fn ticks_fired(&self) -> u64 {
        self.ticks_fired
    }

    /// The tick waiting to fire, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<TickToken> {
        self.pending
    }

    /// When the pending tick is due, if one is scheduled.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.map(|token| token.due)
    }

    /// Starts or stops playback.
    ///
    /// Starting requires a non-empty frontier; on an exhausted engine the
    /// scheduler stays paused and schedules nothing. Stopping always succeeds
    /// and cancels the pending tick.
    pub fn toggle<P>(&mut self, engine: &TraversalEngine<P>, now: Duration) -> PlaybackState {
        match self.state {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused if engine.is_exhausted() => {
                debug!(epoch = self.epoch, "spread exhausted; playback stays paused");
            }
            PlaybackState::Paused => {
                self.state = PlaybackState::Running;
                self.schedule(now + self.interval);
                debug!(
                    epoch = self.epoch,
                    interval_ms = self.interval.as_millis(),
                    "playback started"
                );
            }
        }
        self.state
    }

    /// Stops playback and invalidates the pending tick.
    pub fn pause(&mut self) {
        self.generation += 1;
        self.pending = None;
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
            debug!(epoch = self.epoch, "playback paused");
        }
    }

    /// Fires every tick due at or before `now`, in order. Returns the number
    /// of steps taken.
    pub fn poll<P>(&mut self, engine: &mut TraversalEngine<P>, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(token) = self.pending.filter(|token| token.due <= now) {
            if let TickOutcome::Stepped(_) = self.fire(engine, token) {
                fired += 1;
            }
        }
        fired
    }

    /// Fires a single tick.
    ///
    /// The token must be the one currently pending; any other token is
    /// rejected as [`TickOutcome::Stale`] without touching the engine. After a
    /// step the next tick is scheduled one interval later unless the step
    /// exhausted the spread, in which case playback pauses itself.
    pub fn fire<P>(&mut self, engine: &mut TraversalEngine<P>, token: TickToken) -> TickOutcome {
        if self.pending != Some(token)
            || token.epoch != self.epoch
            || token.generation != self.generation
        {
            debug!(
                epoch = token.epoch,
                generation = token.generation,
                "discarding stale tick"
            );
            return TickOutcome::Stale;
        }

        self.pending = None;
        let progress = engine.step();
        self.ticks_fired += 1;
        if progress.is_exhausted() {
            self.pause();
            info!(
                epoch = self.epoch,
                ticks = self.ticks_fired,
                "spread complete; playback paused"
            );
        } else {
            self.schedule(token.due + self.interval);
        }
        TickOutcome::Stepped(progress)
    }

    fn schedule(&mut self, due: Duration) {
        self.pending = Some(TickToken {
            epoch: self.epoch,
            generation: self.generation,
            due,
        });
    }
}

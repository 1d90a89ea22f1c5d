//! Time sources used to drive playback.

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time measured from the start of a run.
pub trait Clock {
    /// Time elapsed since the clock started.
    fn now(&self) -> Duration;

    /// Blocks, or advances, until `deadline` has been reached.
    fn wait_until(&mut self, deadline: Duration);
}

/// Real time, for interactive runs.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    started: Instant,
}

impl WallClock {
    /// Starts a clock at the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn wait_until(&mut self, deadline: Duration) {
        let remaining = deadline.saturating_sub(self.now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }
}

/// Simulated time that jumps straight to each deadline.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ripple_cli::cli::{Clock, VirtualClock};
///
/// let mut clock = VirtualClock::default();
/// clock.wait_until(Duration::from_millis(250));
/// assert_eq!(clock.now(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualClock {
    now: Duration,
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn wait_until(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

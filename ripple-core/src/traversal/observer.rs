//! Observer registry for traversal progress.
//!
//! Any number of observers may subscribe. Each one is notified after every
//! step in registration order and stays registered until it unsubscribes.

use std::{fmt, sync::mpsc};

use tracing::debug;

use super::progress::Progress;

/// Receives a snapshot after every traversal step.
///
/// Implemented for every `FnMut(&Progress)` closure.
pub trait ProgressObserver {
    /// Called once per completed step, after the frontier has been replaced.
    fn on_progress(&mut self, progress: &Progress);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&Progress),
{
    fn on_progress(&mut self, progress: &Progress) {
        self(progress);
    }
}

/// Handle returned by a subscription, used to unsubscribe later.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubscriptionId(u64);

/// Ordered set of registered observers.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn ProgressObserver>)>,
}

impl Subscribers {
    /// Registers `observer` and returns its handle.
    pub fn subscribe(&mut self, observer: impl ProgressObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Removes the observer registered under `id`. Returns `false` when no
    /// such observer exists.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn notify(&mut self, progress: &Progress) {
        for (_, observer) in &mut self.entries {
            observer.on_progress(progress);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("next_id", &self.next_id)
            .field(
                "ids",
                &self.entries.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Observer that forwards snapshots into an [`mpsc`] channel, for consumers
/// that prefer to drain progress as a stream.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ripple_core::{ChannelObserver, Graph, TraversalEngine};
///
/// let graph = Arc::new(Graph::from_links(2, &[(0, 1)]).expect("links are valid"));
/// let mut engine = TraversalEngine::new(graph);
/// let (observer, receiver) = ChannelObserver::channel();
/// engine.subscribe(observer);
/// engine.step();
/// engine.step();
/// let steps: Vec<usize> = receiver.try_iter().map(|progress| progress.step()).collect();
/// assert_eq!(steps, vec![1, 2]);
/// ```
#[derive(Debug)]
pub struct ChannelObserver {
    sender: mpsc::Sender<Progress>,
    disconnected: bool,
}

impl ChannelObserver {
    /// Wraps an existing sender.
    #[must_use]
    pub const fn new(sender: mpsc::Sender<Progress>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }

    /// Creates an observer together with the receiving end of its channel.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<Progress>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&mut self, progress: &Progress) {
        if self.disconnected {
            return;
        }
        if self.sender.send(progress.clone()).is_err() {
            debug!("progress receiver dropped; discarding further snapshots");
            self.disconnected = true;
        }
    }
}

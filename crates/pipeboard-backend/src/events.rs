//! Graph-changed notifications as a scoped resource.
//!
//! A [`Subscription`] is acquired from a backend, consumed by awaiting
//! [`Subscription::changed`], and must be released exactly once during
//! session teardown via [`Subscription::release`]. Dropping an unreleased
//! subscription releases it too, as a backstop for abnormal teardown paths;
//! orderly teardown should still call `release` explicitly.
//!
//! [`ChangeBus`] is the sender side used by in-process backends: a concurrent
//! registry of subscriber channels. Notifications carry no payload; receivers
//! are expected to re-fetch the canonical graph.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A live registration for graph-changed notifications.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<()>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps a receiver and the action that unregisters it.
    pub fn new(rx: mpsc::UnboundedReceiver<()>, release: impl FnOnce() + Send + 'static) -> Self {
        Subscription {
            rx,
            release: Some(Box::new(release)),
        }
    }

    /// Waits for the next notification. Returns `false` once the sender side
    /// is gone and no notifications remain.
    pub async fn changed(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Drains any queued notifications without waiting. Returns `true` if at
    /// least one was pending, so a burst coalesces into a single re-fetch.
    pub fn try_changed(&mut self) -> bool {
        let mut notified = false;
        while self.rx.try_recv().is_ok() {
            notified = true;
        }
        notified
    }

    /// Releases the registration. Consumes the subscription; calling this is
    /// the orderly-teardown path and can only happen once.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Concurrent registry of graph-changed subscribers.
///
/// The registry is shared (cheaply clonable); each subscription holds onto it
/// so its release handle can unregister without borrowing the bus.
#[derive(Debug, Default, Clone)]
pub struct ChangeBus {
    subscribers: Arc<DashMap<Uuid, mpsc::UnboundedSender<()>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        ChangeBus::default()
    }

    /// Registers a new subscriber. The returned subscription unregisters
    /// itself on release.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.subscribers.insert(id, tx);
        let subscribers = Arc::clone(&self.subscribers);
        Subscription::new(rx, move || {
            subscribers.remove(&id);
        })
    }

    /// Notifies every live subscriber, pruning any whose receiver is gone.
    pub fn notify(&self) {
        let mut dead = Vec::new();
        for entry in self.subscribers.iter() {
            if entry.value().send(()).is_err() {
                dead.push(*entry.key());
            }
        }
        for id in dead {
            self.subscribers.remove(&id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notification_reaches_subscriber() {
        let bus = ChangeBus::new();
        let mut subscription = bus.subscribe();

        bus.notify();
        assert!(subscription.changed().await);
    }

    #[tokio::test]
    async fn burst_coalesces_through_try_changed() {
        let bus = ChangeBus::new();
        let mut subscription = bus.subscribe();

        bus.notify();
        bus.notify();
        bus.notify();

        assert!(subscription.try_changed());
        // The burst is fully drained.
        assert!(!subscription.try_changed());
    }

    #[tokio::test]
    async fn release_unregisters_exactly_once() {
        let bus = ChangeBus::new();
        let subscription = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        subscription.release();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn drop_releases_as_backstop() {
        let bus = ChangeBus::new();
        {
            let _subscription = bus.subscribe();
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn notify_prunes_dead_subscribers() {
        let bus = ChangeBus::new();
        let mut live = bus.subscribe();

        // A subscriber whose receiver is gone but whose registration was
        // leaked rather than released.
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        bus.subscribers.insert(Uuid::new_v4(), tx);
        assert_eq!(bus.subscriber_count(), 2);

        bus.notify();
        assert_eq!(bus.subscriber_count(), 1);
        assert!(live.changed().await);
    }
}

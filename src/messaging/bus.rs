/// Event bus for broadcasting sequencer events
///
/// Fan-out over unbounded channels: publishing never blocks the drain loop,
/// and a subscriber that falls behind or disappears is simply skipped.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;

use super::events::Event;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    sender: Sender<Event>,
}

struct Inner {
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicUsize,
}

/// Cloneable handle to a shared event bus
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        let (tx, rx) = unbounded();
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));

        self.inner
            .subscribers
            .write()
            .push(Subscriber { id, sender: tx });

        (rx, id)
    }

    /// Unsubscribe from events
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: Event) {
        let subscribers = self.inner.subscribers.read();
        for subscriber in subscribers.iter() {
            // A closed channel means the subscriber is gone; nothing to do
            let _ = subscriber.sender.try_send(event.clone());
        }
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

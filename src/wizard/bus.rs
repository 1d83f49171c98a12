//! Controller event fan-out
//!
//! Each front end gets its own unbounded channel. A new subscription is
//! primed with events describing the current view, so a front end can draw
//! the headers and buttons without waiting for the next change.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use super::events::WizardEvent;

/// Handle for cancelling a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Sender<WizardEvent>)>,
}

/// Broadcasts [`WizardEvent`]s to every live subscription
#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a subscription. `primer` is delivered before any later event.
    pub fn subscribe<I>(&self, primer: I) -> (Receiver<WizardEvent>, SubscriptionId)
    where
        I: IntoIterator<Item = WizardEvent>,
    {
        let (tx, rx) = unbounded();
        for event in primer {
            // Receiver is still in hand, the send cannot fail
            let _ = tx.send(event);
        }

        let mut registry = self.registry.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.push((id, tx));
        (rx, id)
    }

    /// Cancel a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.subscribers.len();
        registry.subscribers.retain(|(sub, _)| *sub != id);
        registry.subscribers.len() != before
    }

    /// Deliver an event to every subscription, forgetting dropped receivers
    pub fn publish(&self, event: WizardEvent) {
        let mut registry = self.registry.lock();
        registry.subscribers.retain(|(id, tx)| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                tracing::trace!("Subscription {:?} closed, removed", id);
            }
            delivered
        });
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().subscribers.len()
    }
}

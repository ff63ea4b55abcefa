//! Event bus broadcasting session changes to subscribers.

use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{
    DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, SubscriptionId,
    ThreadEvent,
};

/// Internal subscription state.
struct Subscription {
    filter: SubscriptionFilter,
    sender: Sender<ThreadEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if the buffer is full or the
    /// receiver is gone.
    fn try_send(&self, event: ThreadEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }
}

/// Manages subscriptions and broadcasts events.
pub struct EventBus {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription. Only events broadcast after this call are
    /// delivered.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        self.subscriptions.write().insert(
            id,
            Subscription {
                filter: config.filter,
                sender,
            },
        );

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Best effort.
            let _ = sub.sender.try_send(ThreadEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Send `event` to every matching subscriber. Drops subscribers that
    /// fail to receive.
    pub fn broadcast(&self, event: ThreadEvent) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if sub.filter.matches(&event) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    debug!(subscription = id.0, "dropping slow subscriber");
                    // Likely fails on a full buffer; the closed channel is
                    // the real signal.
                    let _ = sub.sender.try_send(ThreadEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::types::NodeId;

    fn liked(id: &str) -> ThreadEvent {
        ThreadEvent::LikeToggled {
            id: NodeId::from(id),
            liked: true,
        }
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let bus = EventBus::new();

        let handle = bus.subscribe(SubscriptionConfig::default());
        assert_eq!(bus.subscription_count(), 1);

        bus.unsubscribe(handle.id);
        assert_eq!(bus.subscription_count(), 0);
        assert_eq!(
            handle.try_recv().unwrap(),
            ThreadEvent::Dropped {
                reason: DropReason::Unsubscribed
            }
        );
    }

    #[test]
    fn test_broadcast_to_matching() {
        let bus = EventBus::new();
        let content = bus.subscribe(SubscriptionConfig {
            filter: SubscriptionFilter::kinds(vec![EventKind::Content]),
            ..Default::default()
        });
        let everything = bus.subscribe(SubscriptionConfig::default());

        bus.broadcast(liked("a"));

        assert!(content.try_recv().is_err());
        assert_eq!(everything.try_recv().unwrap(), liked("a"));
    }

    #[test]
    fn test_drop_slow_subscriber() {
        let bus = EventBus::new();
        let handle = bus.subscribe(SubscriptionConfig {
            buffer_size: 2,
            filter: SubscriptionFilter::all(),
        });

        for i in 0..10 {
            bus.broadcast(liked(&format!("n{i}")));
        }

        assert_eq!(bus.subscription_count(), 0);
        // The buffered events are still readable, then the channel closes.
        assert_eq!(handle.drain().len(), 2);
        assert!(matches!(
            handle.try_recv(),
            Err(crossbeam_channel::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_dropped_receiver_is_cleaned_up() {
        let bus = EventBus::new();
        let handle = bus.subscribe(SubscriptionConfig::default());
        drop(handle);

        bus.broadcast(liked("a"));
        assert_eq!(bus.subscription_count(), 0);
    }
}

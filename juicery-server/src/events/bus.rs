//! Event bus
//!
//! ```text
//! workflow (after commit) ──▶ EventBus::publish ──▶ broadcast::Sender<ServerEvent>
//!                                                        │
//!                        ┌───────────────────────────────┼──────────────────┐
//!                        ▼                               ▼                  ▼
//!                 WebSocket session             WebSocket session     SMS auto-notify
//! ```
//!
//! Fire-and-forget: no acknowledgment, persistence or replay. A subscriber that
//! falls more than the channel capacity behind skips the oldest events.

use shared::message::ServerEvent;
use tokio::sync::broadcast;

/// Default broadcast capacity
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Push an event to every current subscriber
    ///
    /// Returns the number of subscribers reached; zero is not an error.
    pub fn publish(&self, event: ServerEvent) -> usize {
        let name = event.name();
        match self.tx.send(event) {
            Ok(n) => {
                tracing::debug!(event = name, subscribers = n, "Event published");
                n
            }
            Err(_) => {
                tracing::trace!(event = name, "Event dropped, no subscribers");
                0
            }
        }
    }

    /// Publish several events in order
    pub fn publish_all(&self, events: impl IntoIterator<Item = ServerEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

//! In-process lifecycle event publisher.
//!
//! Broadcast-channel fan-out of [`TemplateLifecycleEvent`]s to any number
//! of subscribers. Delivery is at-most-once: a slow subscriber that lags
//! past the channel capacity loses the oldest events. A durable bus
//! integration replaces this publisher at the same subscription seam.

use tokio::sync::broadcast;

use super::TemplateLifecycleEvent;

/// Broadcast publisher for template lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<TemplateLifecycleEvent>,
}

impl EventPublisher {
    /// Create a publisher with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Publishing with no subscribers succeeds; the event is simply
    /// dropped.
    pub fn publish(&self, event: TemplateLifecycleEvent) -> Result<(), PublishError> {
        match self.sender.send(event) {
            Ok(_) => Ok(()),
            // No subscribers - acceptable for lifecycle announcements
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TemplateLifecycleEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Error types for event publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("event channel is closed")]
    ChannelClosed,
}

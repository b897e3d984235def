//! Progress and failure notifications for a running command.
//!
//! The purchase orchestrator reports each step of an approve, pay and
//! settle sequence here, and the market service reports listing uploads,
//! downloads and their failures. The CLI's notification printer is the
//! usual subscriber: it turns every [`MarketEvent`] into a one-line toast
//! on stderr while the command is still running.

use tokio::sync::broadcast;

use super::MarketEvent;

/// Fan-out of [`MarketEvent`]s from the services to whoever is showing
/// notifications.
///
/// Publishing never blocks an operation. A subscriber that falls more than
/// `capacity` events behind skips the oldest ones and is told how many it
/// missed.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<MarketEvent>,
}

impl NotificationBus {
    /// Creates a bus holding up to `capacity` unread events per subscriber
    /// (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Hands `event` to every current subscriber and returns how many got
    /// it. With nobody listening, the notification is simply not shown.
    pub fn publish(&self, event: MarketEvent) -> usize {
        tracing::debug!(
            event_type = event.event_type_str(),
            at = %event.timestamp(),
            "notification"
        );
        self.sender.send(event).unwrap_or(0)
    }

    /// Starts receiving notifications published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(256)
    }
}

//! Process-wide publish point for installer events

use tokio::sync::broadcast;
use tracing::{debug, error, info, trace, warn};

use crate::{AppEvent, EventLevel, EventMessage, EventMeta};

/// Receiving half handed to each subscriber
pub type EventReceiver = broadcast::Receiver<EventMessage>;

/// Broadcast bus shared by every backend. Cloning yields another handle to
/// the same bus.
///
/// Publishing never blocks and never fails: with no subscriber attached the
/// event is dropped, and a subscriber that falls more than the bus capacity
/// behind observes `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Attach a new subscriber; it only sees events published after this call
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish a message, returning how many subscribers received it
    pub fn publish(&self, message: EventMessage) -> usize {
        log_message(&message);
        self.sender.send(message).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn log_message(message: &EventMessage) {
    let EventMessage { meta, event } = message;
    let source = meta.source.as_str();
    let package = event.package_name().unwrap_or("-");
    match meta.level {
        EventLevel::Error => error!(target: "aurora::events", source, package, ?event, "event"),
        EventLevel::Warn => warn!(target: "aurora::events", source, package, ?event, "event"),
        EventLevel::Info => info!(target: "aurora::events", source, package, ?event, "event"),
        EventLevel::Debug => debug!(target: "aurora::events", source, package, ?event, "event"),
        EventLevel::Trace => trace!(target: "aurora::events", source, package, ?event, "event"),
    }
}

/// Build the default metadata for an event
#[must_use]
pub fn default_meta(event: &AppEvent) -> EventMeta {
    let meta = EventMeta::new(event.log_level(), event.event_source());
    match event.package_name() {
        Some(package) => meta.with_correlation_id(package),
        None => meta,
    }
}

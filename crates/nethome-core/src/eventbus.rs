//! Event bus distributing events between items.
//!
//! The bus is a broadcast channel: every published event reaches every
//! subscriber. Slow subscribers may miss events under load; receivers
//! tolerate the lag and keep going.

use tokio::sync::broadcast;
use tracing::warn;

use crate::event::{EventMetadata, HomeEvent};

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Event bus for the hub.
///
/// Supports publishing with automatic metadata, plain subscriptions and
/// filtered subscriptions for specific event types or sources.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<(HomeEvent, EventMetadata)>,
}

impl EventBus {
    /// Create a new event bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new event bus with the specified capacity.
    ///
    /// The capacity determines how many events are buffered for slow
    /// subscribers.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Get the number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish an event with default metadata.
    ///
    /// Returns `true` if there was at least one subscriber; events published
    /// with no subscribers are discarded.
    pub async fn publish(&self, event: HomeEvent) -> bool {
        self.publish_with_source(event, "system").await
    }

    /// Publish an event attributed to the given source item.
    pub async fn publish_with_source(&self, event: HomeEvent, source: impl Into<String>) -> bool {
        self.publish_with_metadata(event, EventMetadata::new(source))
            .await
    }

    /// Publish an event with explicit metadata.
    pub async fn publish_with_metadata(&self, event: HomeEvent, metadata: EventMetadata) -> bool {
        self.tx.send((event, metadata)).is_ok()
    }

    /// Subscribe to all events.
    pub fn subscribe(&self) -> EventBusReceiver {
        EventBusReceiver {
            rx: self.tx.subscribe(),
        }
    }

    /// Subscribe to events matching a filter.
    pub fn subscribe_filtered<F>(&self, filter: F) -> FilteredReceiver<F>
    where
        F: Fn(&HomeEvent, &EventMetadata) -> bool + Send + 'static,
    {
        FilteredReceiver::new(self.tx.subscribe(), filter)
    }

    /// Create a filtered subscription helper for common patterns.
    pub fn filter(&self) -> FilterBuilder {
        FilterBuilder {
            tx: self.tx.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver for all events from the event bus.
pub struct EventBusReceiver {
    rx: broadcast::Receiver<(HomeEvent, EventMetadata)>,
}

impl EventBusReceiver {
    /// Receive the next event.
    ///
    /// Returns `None` if the event bus is closed.
    pub async fn recv(&mut self) -> Option<(HomeEvent, EventMetadata)> {
        loop {
            match self.rx.recv().await {
                Ok(pair) => return Some(pair),
                // Missed some events but can continue receiving.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event receiver lagged, events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&mut self) -> Option<(HomeEvent, EventMetadata)> {
        self.rx.try_recv().ok()
    }
}

/// Receiver for filtered events from the event bus.
pub struct FilteredReceiver<F>
where
    F: Fn(&HomeEvent, &EventMetadata) -> bool + Send,
{
    rx: broadcast::Receiver<(HomeEvent, EventMetadata)>,
    filter: F,
}

impl<F> FilteredReceiver<F>
where
    F: Fn(&HomeEvent, &EventMetadata) -> bool + Send,
{
    fn new(rx: broadcast::Receiver<(HomeEvent, EventMetadata)>, filter: F) -> Self {
        Self { rx, filter }
    }

    /// Receive the next event matching the filter.
    ///
    /// Returns `None` if the event bus is closed.
    pub async fn recv(&mut self) -> Option<(HomeEvent, EventMetadata)> {
        loop {
            match self.rx.recv().await {
                Ok((event, meta)) => {
                    if (self.filter)(&event, &meta) {
                        return Some((event, meta));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event receiver lagged, events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to receive a matching event without blocking.
    pub fn try_recv(&mut self) -> Option<(HomeEvent, EventMetadata)> {
        while let Ok((event, meta)) = self.rx.try_recv() {
            if (self.filter)(&event, &meta) {
                return Some((event, meta));
            }
        }
        None
    }
}

/// Builder for creating filtered subscriptions.
pub struct FilterBuilder {
    tx: broadcast::Sender<(HomeEvent, EventMetadata)>,
}

impl FilterBuilder {
    /// Subscribe to events of one type only.
    pub fn of_type(
        &self,
        event_type: impl Into<String>,
    ) -> FilteredReceiver<impl Fn(&HomeEvent, &EventMetadata) -> bool + Send + 'static> {
        let wanted = event_type.into();
        FilteredReceiver::new(self.tx.subscribe(), move |event, _| {
            event.event_type() == wanted
        })
    }

    /// Subscribe to events published by one source item only.
    pub fn from_source(
        &self,
        source: impl Into<String>,
    ) -> FilteredReceiver<impl Fn(&HomeEvent, &EventMetadata) -> bool + Send + 'static> {
        let wanted = source.into();
        FilteredReceiver::new(self.tx.subscribe(), move |_, meta| meta.source == wanted)
    }
}

//! Hub events.
//!
//! Items communicate by publishing [`HomeEvent`]s on the event bus. An event
//! is a named type plus a bag of typed attributes; receivers read the
//! attributes they understand and ignore the rest.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Value;

/// Well-known event attribute names.
pub mod attributes {
    /// The value carried by sensor events.
    pub const VALUE: &str = "Value";
    /// Direction of a protocol event ("In"/"Out").
    pub const DIRECTION: &str = "Direction";
}

/// Well-known event types.
pub mod types {
    /// Emitted once a minute by the server.
    pub const MINUTE: &str = "MinuteEvent";
    /// Reports a changed item attribute.
    pub const ATTRIBUTE_CHANGED: &str = "AttributeChangedEvent";
}

/// An event distributed between items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeEvent {
    event_type: String,
    attributes: HashMap<String, Value>,
}

impl HomeEvent {
    /// Create a new event of the given type.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute to the event.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The attribute in its external string form, or `""` when absent.
    pub fn attribute_string(&self, name: &str) -> String {
        self.attributes
            .get(name)
            .map(Value::marshal)
            .unwrap_or_default()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

/// Metadata attached to every published event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event id.
    pub id: Uuid,
    /// Name of the item (or "system") that published the event.
    pub source: String,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
}

impl EventMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            timestamp: Utc::now(),
        }
    }
}

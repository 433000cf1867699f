//! Core types for the NetHome hub.
//!
//! This crate defines the foundational abstractions shared across the
//! workspace: the tagged attribute value model, hub events and the event bus
//! that distributes them.

pub mod event;
pub mod eventbus;
pub mod value;

pub use event::{EventMetadata, HomeEvent};
pub use eventbus::{
    DEFAULT_CHANNEL_CAPACITY, EventBus, EventBusReceiver, FilterBuilder, FilteredReceiver,
};
pub use value::{AttributeType, Value, ValueError};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::event::{EventMetadata, HomeEvent};
    pub use crate::eventbus::{EventBus, EventBusReceiver};
    pub use crate::value::{AttributeType, Value, ValueError};
}

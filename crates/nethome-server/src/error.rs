//! Hub-level errors.

use nethome_model::{ItemError, ModelParseError};

/// Errors from hosting and addressing items.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The factory knows no item class by this name.
    #[error("Unknown item class: {0}")]
    UnknownClass(String),

    /// Another item already carries this name.
    #[error("Item name already in use: {0}")]
    NameInUse(String),

    /// No item matches the given name or id.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The item's model XML failed to parse.
    #[error(transparent)]
    Model(#[from] ModelParseError),

    /// An item rejected a configured attribute value or an action failed.
    #[error(transparent)]
    Item(#[from] ItemError),
}

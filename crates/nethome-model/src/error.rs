//! Error taxonomy for the item model layer.
//!
//! Two families are kept strictly apart:
//!
//! - [`ModelError`]: the model definition itself is wrong or incomplete
//!   (unknown attribute name, a method the XML references was never
//!   registered). These degrade to safe defaults on the access paths and
//!   surface only when querying the model definition directly.
//! - [`ItemError`]: the item's own domain logic rejected the call (illegal
//!   attribute value, action execution failure). These always propagate to
//!   the caller.

/// Failures in the model definition or its binding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The named attribute is not declared in the item's model.
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    /// The named action is not declared in the item's model.
    #[error("Action not found: {0}")]
    ActionNotFound(String),

    /// The attribute declares no get method, or the method is not registered.
    #[error("Attribute {0} is not readable")]
    NotReadable(String),

    /// The attribute declares no set method, or the method is not registered.
    #[error("Attribute {0} is not writable")]
    NotWritable(String),

    /// The action's method was not registered in the capability table, so the
    /// binding was rejected when the model was built.
    #[error("Action {0} is not bound to a registered method")]
    ActionNotBound(String),

    /// A capability thunk was invoked against an item of another type.
    #[error("Item is not of the type that registered capability {0}")]
    WrongItemType(String),
}

/// Domain failures raised by an item's own attribute and action code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    /// A setter rejected the attempted value. The original value is carried
    /// so callers can report exactly what was refused.
    #[error("Illegal value \"{value}\" for attribute {attribute}")]
    IllegalValue { attribute: String, value: String },

    /// An action ran and failed.
    #[error("Action {action} failed: {reason}")]
    ExecutionFailure { action: String, reason: String },
}

impl ItemError {
    pub fn illegal_value(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::IllegalValue {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn execution_failure(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExecutionFailure {
            action: action.into(),
            reason: reason.into(),
        }
    }
}

/// Combined error type returned by capability invocation.
///
/// The proxy splits on the variant: model errors degrade (empty read, no-op
/// write), item errors propagate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Item(#[from] ItemError),
}

//! Item attribute/action model for the NetHome hub.
//!
//! Every hosted item declares its surface in a small XML model and backs it
//! with typed accessors registered in a capability table. This crate turns
//! that declaration into a runtime-introspectable model:
//!
//! - **CapabilityTable**: explicit per-type registry of getters, setters,
//!   initializers and actions, keyed by the method names the XML refers to.
//! - **ItemModel**: the parsed XML bound against the table, in declaration
//!   order, with read-only/write-only/init semantics.
//! - **ModelRegistry**: per-type model cache owned by the hosting server;
//!   morphing items bump a version counter to invalidate.
//! - **LocalItemProxy**: string-in/string-out façade with the silent-degrade
//!   read path and strict propagation of domain validation errors.
//! - **RelationCache**: point-in-time reverse-reference queries over
//!   Item/Items/Command-typed attributes.

pub mod capability;
pub mod error;
pub mod item;
pub mod model;
pub mod proxy;
pub mod registry;
pub mod relation;
pub mod xml;

pub use capability::CapabilityTable;
pub use error::{DispatchError, ItemError, ModelError};
pub use item::{HomeItem, ItemId, ItemInstance};
pub use model::{ActionInfo, ActionModel, AttributeInfo, AttributeModel, ItemModel, ModelInfo};
pub use proxy::{builtin, ItemProxy, LocalItemProxy};
pub use registry::ModelRegistry;
pub use relation::{RelationCache, RelationItem};
pub use xml::{ActionDescriptor, AttributeDescriptor, ModelDescriptor, ModelParseError};

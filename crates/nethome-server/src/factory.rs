//! Item factory: class-name to constructor registry.
//!
//! Item types are registered in-process; creating an item by class name is a
//! plain table lookup, and an unknown class is a checked error rather than a
//! reflective fallback.

use std::collections::BTreeMap;

use nethome_model::HomeItem;

use crate::error::HubError;

/// Constructor for one item class.
pub type ItemConstructor = fn() -> Box<dyn HomeItem>;

/// Registry of creatable item classes.
#[derive(Default)]
pub struct ItemFactory {
    constructors: BTreeMap<String, ItemConstructor>,
}

impl ItemFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(&mut self, class: impl Into<String>, constructor: ItemConstructor) {
        self.constructors.insert(class.into(), constructor);
    }

    /// Create a fresh, unconfigured item of the given class.
    pub fn create(&self, class: &str) -> Result<Box<dyn HomeItem>, HubError> {
        self.constructors
            .get(class)
            .map(|constructor| constructor())
            .ok_or_else(|| HubError::UnknownClass(class.to_string()))
    }

    /// All registered class names, sorted.
    pub fn classes(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }
}

//! The attribute/action façade over a hosted item.
//!
//! Callers (UI, REST, relation queries, other items) never touch an item
//! directly; they go through a proxy that speaks strings. The read path
//! degrades silently: an absent attribute, an unbound getter, or a getter
//! failure all read as `""`. The write path answers `false` for anything
//! that cannot be set, but a setter that *rejects* its value surfaces that
//! rejection to the caller, attempted value attached.
//!
//! Name, ID and Model are built-in pseudo-attributes served straight from the
//! instance record; Name and ID are writable only during the construction
//! window, before the item is registered under a real name.

use std::sync::Arc;

use tracing::debug;

use crate::error::{DispatchError, ItemError};
use crate::item::ItemInstance;
use crate::model::{ItemModel, ModelInfo};
use crate::registry::ModelRegistry;
use crate::xml::ModelParseError;

/// Built-in pseudo-attribute names.
pub mod builtin {
    pub const NAME: &str = "Name";
    pub const ID: &str = "ID";
    pub const MODEL: &str = "Model";
}

/// String-typed access to one item's attributes and actions.
pub trait ItemProxy {
    /// Read an attribute in its external string form.
    ///
    /// Returns `""` for anything that cannot be read.
    fn attribute_value(&self, name: &str) -> String;

    /// Write an attribute from its external string form.
    ///
    /// `Ok(true)` on success, `Ok(false)` when the attribute is absent or not
    /// settable (no state is altered). A value the item rejects surfaces as
    /// [`ItemError::IllegalValue`].
    fn set_attribute_value(&mut self, name: &str, value: &str) -> Result<bool, ItemError>;

    /// Invoke an action by name.
    ///
    /// Returns `Ok("")` when the action is absent or uninvocable; an action
    /// that runs and fails surfaces as [`ItemError::ExecutionFailure`].
    fn call_action(&mut self, name: &str) -> Result<String, ItemError>;

    /// Serializable model metadata for this item.
    fn model_info(&self) -> ModelInfo;
}

/// Proxy over an item hosted in this process.
pub struct LocalItemProxy<'a> {
    instance: &'a mut ItemInstance,
    model: Arc<ItemModel>,
}

impl<'a> LocalItemProxy<'a> {
    /// Open a proxy, resolving the item's model through the registry.
    pub fn open(
        instance: &'a mut ItemInstance,
        registry: &ModelRegistry,
    ) -> Result<Self, ModelParseError> {
        let model = registry.model_for(instance.item())?;
        Ok(Self { instance, model })
    }

    /// Open a proxy with an already resolved model.
    pub fn with_model(instance: &'a mut ItemInstance, model: Arc<ItemModel>) -> Self {
        Self { instance, model }
    }

    pub fn model(&self) -> &ItemModel {
        &self.model
    }

    pub fn name(&self) -> &str {
        self.instance.name()
    }

    pub fn id(&self) -> crate::item::ItemId {
        self.instance.id()
    }

    /// The default display value: the model's default attribute, read through
    /// the normal degrading path.
    pub fn default_attribute_value(&self) -> String {
        match self.model.default_attribute() {
            Some(attribute) => self.attribute_value(attribute.name()),
            None => String::new(),
        }
    }
}

impl ItemProxy for LocalItemProxy<'_> {
    fn attribute_value(&self, name: &str) -> String {
        match name {
            builtin::NAME => return self.instance.name().to_string(),
            builtin::ID => return self.instance.id().to_string(),
            builtin::MODEL => return self.instance.item().model_xml().to_string(),
            _ => {}
        }

        let Ok(attribute) = self.model.attribute(name) else {
            return String::new();
        };
        match attribute.value_of(self.instance.item()) {
            Ok(value) => value.marshal(),
            Err(error) => {
                debug!(item = self.instance.name(), attribute = name, %error, "read degraded to empty");
                String::new()
            }
        }
    }

    fn set_attribute_value(&mut self, name: &str, value: &str) -> Result<bool, ItemError> {
        match name {
            builtin::NAME => {
                if self.instance.is_registered() {
                    return Ok(false);
                }
                self.instance.set_name(value);
                return Ok(true);
            }
            builtin::ID => {
                if self.instance.is_registered() {
                    return Ok(false);
                }
                let id = value
                    .trim()
                    .parse()
                    .map_err(|_| ItemError::illegal_value(builtin::ID, value))?;
                self.instance.set_id(id);
                return Ok(true);
            }
            builtin::MODEL => return Ok(false),
            _ => {}
        }

        let Ok(attribute) = self.model.attribute(name) else {
            return Ok(false);
        };

        // During the construction window init-capable attributes route to
        // their init method; afterwards only a bound setter counts.
        let in_window = !self.instance.is_registered();
        if in_window {
            if !attribute.can_init() {
                return Ok(false);
            }
        } else if attribute.is_read_only() {
            return Ok(false);
        }

        let typed = attribute
            .kind()
            .unmarshal(value)
            .map_err(|_| ItemError::illegal_value(name, value))?;

        let result = if in_window {
            attribute.init_value(self.instance.item_mut(), &typed)
        } else {
            attribute.set_value(self.instance.item_mut(), &typed)
        };

        match result {
            Ok(()) => Ok(true),
            Err(DispatchError::Item(error)) => Err(error),
            Err(DispatchError::Model(error)) => {
                debug!(item = self.instance.name(), attribute = name, %error, "write ignored");
                Ok(false)
            }
        }
    }

    fn call_action(&mut self, name: &str) -> Result<String, ItemError> {
        let Ok(action) = self.model.action(name) else {
            return Ok(String::new());
        };
        match action.call(self.instance.item_mut()) {
            Ok(result) => Ok(result),
            Err(DispatchError::Item(error)) => Err(error),
            Err(DispatchError::Model(error)) => {
                debug!(item = self.instance.name(), action = name, %error, "action ignored");
                Ok(String::new())
            }
        }
    }

    fn model_info(&self) -> ModelInfo {
        self.model.info()
    }
}

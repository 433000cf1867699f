//! Bound item models.
//!
//! An [`ItemModel`] is the queryable form of one item's declared surface: the
//! parsed XML descriptor bound against the type's capability table. Binding
//! happens once per model build; method names the table does not know leave
//! the affected attribute unreadable/unwritable (or the action invalid), and
//! are logged then rather than failing at call time.

use serde::{Deserialize, Serialize};
use tracing::warn;

use nethome_core::value::{AttributeType, Value};

use crate::capability::{ActionThunk, CapabilityTable, GetterThunk, SetterThunk};
use crate::error::{DispatchError, ModelError};
use crate::item::HomeItem;
use crate::xml::{ActionDescriptor, AttributeDescriptor, ModelDescriptor, ModelParseError};

/// One declared attribute, bound to its accessors.
pub struct AttributeModel {
    descriptor: AttributeDescriptor,
    getter: Option<GetterThunk>,
    setter: Option<SetterThunk>,
    initializer: Option<SetterThunk>,
}

impl AttributeModel {
    fn bind(descriptor: AttributeDescriptor, table: &CapabilityTable, class: &str) -> Self {
        let getter = descriptor.get.as_deref().and_then(|method| {
            let thunk = table.getter_thunk(method);
            if thunk.is_none() {
                warn!(class, attribute = %descriptor.name, method, "get method not registered");
            }
            thunk
        });
        let setter = descriptor.set.as_deref().and_then(|method| {
            let thunk = table.setter_thunk(method);
            if thunk.is_none() {
                warn!(class, attribute = %descriptor.name, method, "set method not registered");
            }
            thunk
        });
        let initializer = descriptor.init.as_deref().and_then(|method| {
            let thunk = table.initializer_thunk(method);
            if thunk.is_none() {
                warn!(class, attribute = %descriptor.name, method, "init method not registered");
            }
            thunk
        });
        Self {
            descriptor,
            getter,
            setter,
            initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> AttributeType {
        self.descriptor.kind
    }

    /// Enumerated legal values, empty for unconstrained attributes.
    pub fn legal_values(&self) -> &[String] {
        &self.descriptor.values
    }

    /// Marked as the default display attribute in the model.
    pub fn is_default(&self) -> bool {
        self.descriptor.is_default
    }

    /// Read-only: no bound set method.
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }

    /// Write-only: no bound get method.
    pub fn is_write_only(&self) -> bool {
        self.getter.is_none()
    }

    /// Initializable during the construction window: an init or set method
    /// is bound.
    pub fn can_init(&self) -> bool {
        self.initializer.is_some() || self.setter.is_some()
    }

    /// Invoke the bound getter.
    pub fn value_of(&self, item: &dyn HomeItem) -> Result<Value, DispatchError> {
        match &self.getter {
            Some(get) => get(item),
            None => Err(ModelError::NotReadable(self.descriptor.name.clone()).into()),
        }
    }

    /// Invoke the bound setter. Domain rejections propagate unchanged.
    pub fn set_value(&self, item: &mut dyn HomeItem, value: &Value) -> Result<(), DispatchError> {
        match &self.setter {
            Some(set) => set(item, value),
            None => Err(ModelError::NotWritable(self.descriptor.name.clone()).into()),
        }
    }

    /// Invoke the init method, falling back to the setter when no dedicated
    /// initializer is bound. Only meaningful during the construction window.
    pub fn init_value(&self, item: &mut dyn HomeItem, value: &Value) -> Result<(), DispatchError> {
        match (&self.initializer, &self.setter) {
            (Some(init), _) => init(item, value),
            (None, Some(set)) => set(item, value),
            (None, None) => Err(ModelError::NotWritable(self.descriptor.name.clone()).into()),
        }
    }

    /// Serializable snapshot for UI/REST consumers.
    pub fn info(&self) -> AttributeInfo {
        AttributeInfo {
            name: self.descriptor.name.clone(),
            kind: self.descriptor.kind,
            read_only: self.is_read_only(),
            write_only: self.is_write_only(),
            can_init: self.can_init(),
            is_default: self.descriptor.is_default,
            legal_values: self.descriptor.values.clone(),
        }
    }
}

/// One declared action, bound to its method.
pub struct ActionModel {
    descriptor: ActionDescriptor,
    thunk: Option<ActionThunk>,
}

impl ActionModel {
    fn bind(descriptor: ActionDescriptor, table: &CapabilityTable, class: &str) -> Self {
        let thunk = table.action_thunk(&descriptor.method);
        if thunk.is_none() {
            warn!(
                class,
                action = %descriptor.name,
                method = %descriptor.method,
                "action method not registered, action is uninvocable"
            );
        }
        Self { descriptor, thunk }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn is_default(&self) -> bool {
        self.descriptor.is_default
    }

    /// Whether the binding resolved; invalid actions were rejected at model
    /// build time and never invoke anything.
    pub fn is_valid(&self) -> bool {
        self.thunk.is_some()
    }

    /// Invoke the bound action method.
    pub fn call(&self, item: &mut dyn HomeItem) -> Result<String, DispatchError> {
        match &self.thunk {
            Some(thunk) => thunk(item),
            None => Err(ModelError::ActionNotBound(self.descriptor.name.clone()).into()),
        }
    }

    pub fn info(&self) -> ActionInfo {
        ActionInfo {
            name: self.descriptor.name.clone(),
            is_default: self.descriptor.is_default,
            valid: self.is_valid(),
        }
    }
}

/// The bound model of one item type (or one morphing instance).
pub struct ItemModel {
    class: String,
    category: String,
    morphing: bool,
    attributes: Vec<AttributeModel>,
    actions: Vec<ActionModel>,
}

impl ItemModel {
    /// Parse and bind an item's current model.
    pub fn build(item: &dyn HomeItem) -> Result<Self, ModelParseError> {
        let descriptor = ModelDescriptor::parse(item.model_xml())?;
        Ok(Self::bind(descriptor, &item.capabilities()))
    }

    /// Bind an already parsed descriptor against a capability table.
    pub fn bind(descriptor: ModelDescriptor, table: &CapabilityTable) -> Self {
        let class = descriptor.class;
        let attributes = descriptor
            .attributes
            .into_iter()
            .map(|d| AttributeModel::bind(d, table, &class))
            .collect();
        let actions = descriptor
            .actions
            .into_iter()
            .map(|d| ActionModel::bind(d, table, &class))
            .collect();
        Self {
            class,
            category: descriptor.category,
            morphing: descriptor.morphing,
            attributes,
            actions,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether the declared model may change at runtime.
    pub fn is_morphing(&self) -> bool {
        self.morphing
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> &[AttributeModel] {
        &self.attributes
    }

    /// Actions in declaration order.
    pub fn actions(&self) -> &[ActionModel] {
        &self.actions
    }

    /// Look up an attribute by name.
    ///
    /// Unlike the proxy's access paths this is a checked failure: internal
    /// callers that need to distinguish "absent" get an error, not a default.
    pub fn attribute(&self, name: &str) -> Result<&AttributeModel, ModelError> {
        self.attributes
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| ModelError::AttributeNotFound(name.to_string()))
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> Result<&ActionModel, ModelError> {
        self.actions
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| ModelError::ActionNotFound(name.to_string()))
    }

    /// The default display attribute: the one flagged `Default="true"`, or
    /// the first declared one.
    pub fn default_attribute(&self) -> Option<&AttributeModel> {
        self.attributes
            .iter()
            .find(|a| a.is_default())
            .or_else(|| self.attributes.first())
    }

    /// Serializable snapshot of the whole model.
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            class: self.class.clone(),
            category: self.category.clone(),
            morphing: self.morphing,
            attributes: self.attributes.iter().map(AttributeModel::info).collect(),
            actions: self.actions.iter().map(ActionModel::info).collect(),
        }
    }
}

/// Serializable view of an attribute's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    pub kind: AttributeType,
    pub read_only: bool,
    pub write_only: bool,
    pub can_init: bool,
    pub is_default: bool,
    #[serde(default)]
    pub legal_values: Vec<String>,
}

/// Serializable view of an action's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionInfo {
    pub name: String,
    pub is_default: bool,
    pub valid: bool,
}

/// Serializable view of a full item model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub class: String,
    pub category: String,
    pub morphing: bool,
    pub attributes: Vec<AttributeInfo>,
    pub actions: Vec<ActionInfo>,
}

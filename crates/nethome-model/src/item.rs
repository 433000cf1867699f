//! The `HomeItem` trait and its runtime record.
//!
//! A HomeItem is a pluggable device or logic unit. It declares its attributes
//! and actions in an XML model (see [`crate::xml`]) and backs them with typed
//! accessors registered in a [`CapabilityTable`]. The hub addresses items only
//! through that declared surface.
//!
//! Lifecycle state (name, numeric id, registration and activation flags) is
//! not the item's concern; it lives on [`ItemInstance`], the record the
//! directory keeps per hosted item.

use std::any::Any;

use nethome_core::event::HomeEvent;

use crate::capability::CapabilityTable;

/// Numeric identifier assigned to an item when it is registered.
pub type ItemId = u64;

/// A pluggable hub component with a declared attribute/action model.
pub trait HomeItem: Any + Send {
    /// The XML model describing this item's attributes and actions.
    ///
    /// For most items this is a fixed string per type. Morphing items may
    /// return different models over time; they must bump
    /// [`model_version`](Self::model_version) whenever the model changes.
    fn model_xml(&self) -> &str;

    /// Version counter for morphing models.
    ///
    /// The model cache keys on `(type, version)`, so a stale version here
    /// means a stale cached model. Fixed-model items keep the default 0.
    fn model_version(&self) -> u32 {
        0
    }

    /// Build the capability table binding method names from the XML model to
    /// typed accessor functions.
    fn capabilities(&self) -> CapabilityTable;

    /// Called once when the item is taken into service.
    fn activate(&mut self) {}

    /// Called once at shutdown.
    fn stop(&mut self) {}

    /// Offer an event to the item. Returns `true` if the item consumed it.
    fn receive_event(&mut self, _event: &HomeEvent) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Runtime record for one hosted item.
///
/// Carries the item together with the lifecycle state the model layer serves
/// through the built-in pseudo-attributes: name, numeric id, and whether the
/// item has been registered (which closes the construction window) and
/// activated.
pub struct ItemInstance {
    id: ItemId,
    name: String,
    registered: bool,
    activated: bool,
    item: Box<dyn HomeItem>,
}

impl ItemInstance {
    /// Wrap a freshly created item. It has no id or name yet and is in its
    /// construction window until [`register`](Self::register) is called.
    pub fn new(item: Box<dyn HomeItem>) -> Self {
        Self {
            id: 0,
            name: String::new(),
            registered: false,
            activated: false,
            item,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the item has been registered under a real name, ending the
    /// construction window.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn item(&self) -> &dyn HomeItem {
        self.item.as_ref()
    }

    pub fn item_mut(&mut self) -> &mut dyn HomeItem {
        self.item.as_mut()
    }

    /// Set the name during the construction window. Ignored once the item
    /// is registered; the directory's name index owns the name from then on.
    pub fn set_name(&mut self, name: impl Into<String>) {
        if !self.registered {
            self.name = name.into();
        }
    }

    /// Set the id during the construction window. Ignored once registered.
    pub fn set_id(&mut self, id: ItemId) {
        if !self.registered {
            self.id = id;
        }
    }

    /// Close the construction window: assign the final id and name.
    pub fn register(&mut self, id: ItemId, name: impl Into<String>) {
        self.id = id;
        self.name = name.into();
        self.registered = true;
    }

    /// Activate the item, once. Repeated calls are no-ops.
    pub fn activate(&mut self) {
        if !self.activated {
            self.item.activate();
            self.activated = true;
        }
    }

    /// Stop the item if it was activated.
    pub fn stop(&mut self) {
        if self.activated {
            self.item.stop();
            self.activated = false;
        }
    }

    pub fn receive_event(&mut self, event: &HomeEvent) -> bool {
        self.item.receive_event(event)
    }
}

impl std::fmt::Debug for ItemInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemInstance")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("registered", &self.registered)
            .field("activated", &self.activated)
            .finish_non_exhaustive()
    }
}

//! The item directory: ownership and addressing of hosted items.
//!
//! The directory owns every [`ItemInstance`] behind an `Arc<Mutex<_>>` so the
//! relation cache can read attribute values live. Items are addressed by
//! numeric id or by name; ids are assigned from a counter at registration and
//! never reused within a run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use nethome_model::{HomeItem, ItemId, ItemInstance};

use crate::error::HubError;

/// Registry of hosted items with id and name indexes.
pub struct ItemDirectory {
    items: RwLock<HashMap<ItemId, Arc<Mutex<ItemInstance>>>>,
    names: RwLock<HashMap<String, ItemId>>,
    /// Registration order, which is also activation order.
    order: RwLock<Vec<ItemId>>,
    next_id: AtomicU64,
}

impl ItemDirectory {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            names: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a wrapped item under a name, closing its construction
    /// window. Returns the assigned id.
    pub fn register(
        &self,
        mut instance: ItemInstance,
        name: &str,
    ) -> Result<ItemId, HubError> {
        let mut names = self.names.write();
        if names.contains_key(name) {
            return Err(HubError::NameInUse(name.to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        instance.register(id, name);
        names.insert(name.to_string(), id);
        self.items.write().insert(id, Arc::new(Mutex::new(instance)));
        self.order.write().push(id);

        debug!(id, name, "registered item");
        Ok(id)
    }

    pub fn get(&self, id: ItemId) -> Option<Arc<Mutex<ItemInstance>>> {
        self.items.read().get(&id).cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<Mutex<ItemInstance>>> {
        let id = *self.names.read().get(name)?;
        self.get(id)
    }

    /// Resolve an item by name, or by id when the string parses as one.
    pub fn find(&self, name_or_id: &str) -> Option<Arc<Mutex<ItemInstance>>> {
        if let Some(instance) = self.get_by_name(name_or_id) {
            return Some(instance);
        }
        name_or_id.trim().parse().ok().and_then(|id| self.get(id))
    }

    /// Rename an item, keeping its id.
    pub fn rename(&self, id: ItemId, new_name: &str) -> Result<(), HubError> {
        let instance = self
            .get(id)
            .ok_or_else(|| HubError::ItemNotFound(id.to_string()))?;

        let mut names = self.names.write();
        if let Some(&holder) = names.get(new_name) {
            if holder != id {
                return Err(HubError::NameInUse(new_name.to_string()));
            }
            return Ok(());
        }

        let mut guard = instance.lock();
        names.remove(guard.name());
        names.insert(new_name.to_string(), id);
        guard.register(id, new_name);
        Ok(())
    }

    /// Remove an item, stopping it if it was active. Returns the removed
    /// instance.
    pub fn remove(&self, id: ItemId) -> Option<Arc<Mutex<ItemInstance>>> {
        let instance = self.items.write().remove(&id)?;
        let name = instance.lock().name().to_string();
        self.names.write().remove(&name);
        instance.lock().stop();
        self.order.write().retain(|entry| *entry != id);
        Some(instance)
    }

    /// All item ids in registration order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.order.read().clone()
    }

    /// All item names in registration order.
    pub fn names(&self) -> Vec<String> {
        let items = self.items.read();
        self.order
            .read()
            .iter()
            .filter_map(|id| items.get(id).map(|i| i.lock().name().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Activate every item in registration order. Already active items are
    /// untouched.
    pub fn activate_all(&self) {
        for id in self.ids() {
            if let Some(instance) = self.get(id) {
                instance.lock().activate();
            }
        }
        info!(count = self.len(), "activated items");
    }

    /// Stop every item, in reverse registration order.
    pub fn stop_all(&self) {
        for id in self.ids().into_iter().rev() {
            if let Some(instance) = self.get(id) {
                instance.lock().stop();
            }
        }
        info!("stopped items");
    }
}

impl Default for ItemDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for wrapping and registering a bare item.
impl ItemDirectory {
    pub fn register_item(
        &self,
        item: Box<dyn HomeItem>,
        name: &str,
    ) -> Result<ItemId, HubError> {
        self.register(ItemInstance::new(item), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::Lamp;

    #[test]
    fn test_register_assigns_increasing_ids() {
        let directory = ItemDirectory::new();
        let a = directory.register_item(Box::<Lamp>::default(), "A").unwrap();
        let b = directory.register_item(Box::<Lamp>::default(), "B").unwrap();
        assert!(b > a);
        assert_eq!(directory.ids(), vec![a, b]);
        assert_eq!(directory.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let directory = ItemDirectory::new();
        directory.register_item(Box::<Lamp>::default(), "A").unwrap();
        assert!(matches!(
            directory.register_item(Box::<Lamp>::default(), "A"),
            Err(HubError::NameInUse(_))
        ));
    }

    #[test]
    fn test_find_by_name_or_id() {
        let directory = ItemDirectory::new();
        let id = directory.register_item(Box::<Lamp>::default(), "Hall").unwrap();

        assert!(directory.find("Hall").is_some());
        assert!(directory.find(&id.to_string()).is_some());
        assert!(directory.find("Missing").is_none());
    }

    #[test]
    fn test_rename_keeps_id() {
        let directory = ItemDirectory::new();
        let id = directory.register_item(Box::<Lamp>::default(), "Old").unwrap();

        directory.rename(id, "New").unwrap();
        assert!(directory.get_by_name("Old").is_none());
        let instance = directory.get_by_name("New").unwrap();
        assert_eq!(instance.lock().id(), id);
    }

    #[test]
    fn test_remove_unregisters_name() {
        let directory = ItemDirectory::new();
        let id = directory.register_item(Box::<Lamp>::default(), "Gone").unwrap();

        assert!(directory.remove(id).is_some());
        assert!(directory.get_by_name("Gone").is_none());
        assert!(directory.is_empty());
        assert!(directory.remove(id).is_none());
    }

    #[test]
    fn test_activation_is_idempotent() {
        let directory = ItemDirectory::new();
        let id = directory.register_item(Box::<Lamp>::default(), "A").unwrap();

        directory.activate_all();
        directory.activate_all();
        let instance = directory.get(id).unwrap();
        assert!(instance.lock().is_activated());

        directory.stop_all();
        assert!(!directory.get(id).unwrap().lock().is_activated());
    }
}

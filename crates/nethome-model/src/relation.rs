//! Reverse-reference queries between items.
//!
//! Items reference each other by name through attributes typed `Item`,
//! `Items` or `Command`. The cache answers "which items reference X" without
//! maintaining bidirectional edges: at add time it records which of an item's
//! attributes are relation-typed (items with none are not stored at all), and
//! at query time it reads each such attribute's *current* value live through
//! a proxy. Attribute values may change freely between queries; no update
//! notifications are needed.
//!
//! Add, remove and query serialize on one internal lock; there is no finer
//! coordination, matching the synchronous call-dispatch model of this layer.

use std::sync::Arc;

use parking_lot::Mutex;

use nethome_core::value::AttributeType;

use crate::item::{ItemId, ItemInstance};
use crate::model::ItemModel;
use crate::proxy::{ItemProxy, LocalItemProxy};

/// One stored item together with its relation-typed attribute names.
pub struct RelationItem {
    instance: Arc<Mutex<ItemInstance>>,
    model: Arc<ItemModel>,
    relations: Vec<(String, AttributeType)>,
}

impl RelationItem {
    /// Scan the model for relation-typed attributes. Returns `None` when the
    /// item has none and is irrelevant to relation queries.
    fn scan(instance: Arc<Mutex<ItemInstance>>, model: Arc<ItemModel>) -> Option<Self> {
        let relations: Vec<_> = model
            .attributes()
            .iter()
            .filter(|a| a.kind().is_relation())
            .map(|a| (a.name().to_string(), a.kind()))
            .collect();
        if relations.is_empty() {
            return None;
        }
        Some(Self {
            instance,
            model,
            relations,
        })
    }

    pub fn id(&self) -> ItemId {
        self.instance.lock().id()
    }

    /// Whether any relation attribute currently references the target.
    ///
    /// Values are read fresh from the item on every call.
    fn references(&self, target: &str) -> bool {
        let mut guard = self.instance.lock();
        let proxy = LocalItemProxy::with_model(&mut *guard, self.model.clone());
        self.relations.iter().any(|(name, kind)| {
            let value = proxy.attribute_value(name);
            match kind {
                AttributeType::Item => value == target,
                AttributeType::Items => value.split(',').any(|part| part == target),
                // By convention the second comma-separated field of a command
                // string is the target item name. Malformed commands simply
                // never match.
                AttributeType::Command => value.split(',').nth(1) == Some(target),
                _ => false,
            }
        })
    }
}

/// Answers "which items reference item X".
#[derive(Default)]
pub struct RelationCache {
    items: Mutex<Vec<RelationItem>>,
}

impl RelationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Items without relation-typed attributes are skipped
    /// entirely; returns whether the item was stored.
    pub fn add_item(&self, instance: Arc<Mutex<ItemInstance>>, model: Arc<ItemModel>) -> bool {
        match RelationItem::scan(instance, model) {
            Some(item) => {
                self.items.lock().push(item);
                true
            }
            None => false,
        }
    }

    /// Remove an item by id. Future queries no longer consider it.
    pub fn remove_item(&self, id: ItemId) {
        self.items.lock().retain(|item| item.id() != id);
    }

    /// All stored items whose relation attributes currently reference the
    /// target name.
    pub fn related_to(&self, target: &str) -> Vec<ItemId> {
        self.items
            .lock()
            .iter()
            .filter(|item| item.references(target))
            .map(RelationItem::id)
            .collect()
    }

    /// Number of stored (relation-relevant) items.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

//! Model cache.
//!
//! Building an [`ItemModel`] means parsing XML and binding a capability
//! table, so the result is cached per item type. The registry is owned by the
//! hosting server and passed where needed; there is no process-global cache.
//!
//! Morphing items report a model version counter which they bump whenever
//! their declared model changes; the cache keys on `(type, version)`, so a
//! bumped version yields a freshly built model and older versions of the same
//! type are evicted. Fixed-model items keep version 0 and share one entry per
//! type.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::item::HomeItem;
use crate::model::ItemModel;
use crate::xml::ModelParseError;

/// Cache of bound item models, keyed by item type and model version.
#[derive(Default)]
pub struct ModelRegistry {
    cache: RwLock<HashMap<(TypeId, u32), Arc<ItemModel>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached model for an item, building it on first use.
    ///
    /// Two calls for an unchanged instance return the identical `Arc`.
    pub fn model_for(&self, item: &dyn HomeItem) -> Result<Arc<ItemModel>, ModelParseError> {
        let type_id = item.as_any().type_id();
        let key = (type_id, item.model_version());

        if let Some(model) = self.cache.read().get(&key) {
            return Ok(model.clone());
        }

        let model = Arc::new(ItemModel::build(item)?);
        debug!(class = model.class(), version = key.1, "built item model");

        let mut cache = self.cache.write();
        // A morphing item's older versions are dead weight once it rebuilds.
        if model.is_morphing() {
            cache.retain(|(id, _), _| *id != type_id);
        }
        let entry = cache.entry(key).or_insert(model);
        Ok(entry.clone())
    }

    /// Drop all cached models; the next query rebuilds.
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    /// Number of cached models.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

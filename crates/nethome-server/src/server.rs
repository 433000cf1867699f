//! The hub server: wires the directory, model cache, relation cache and
//! event bus together and drives item lifecycle.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use nethome_core::event::{types, EventMetadata, HomeEvent};
use nethome_core::eventbus::EventBus;
use nethome_model::{
    ItemId, ItemInstance, ItemProxy, LocalItemProxy, ModelRegistry, RelationCache,
};

use crate::config::ServerConfig;
use crate::directory::ItemDirectory;
use crate::error::HubError;
use crate::factory::ItemFactory;

/// The hub server.
pub struct HomeServer {
    factory: ItemFactory,
    directory: Arc<ItemDirectory>,
    models: Arc<ModelRegistry>,
    relations: Arc<RelationCache>,
    bus: EventBus,
    config: ServerConfig,
}

/// Handles for the server's background tasks.
pub struct ServerHandle {
    distributor: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

impl ServerHandle {
    pub fn abort(&self) {
        self.distributor.abort();
        self.ticker.abort();
    }
}

impl HomeServer {
    pub fn new(factory: ItemFactory) -> Self {
        Self::with_config(factory, ServerConfig::default())
    }

    pub fn with_config(factory: ItemFactory, config: ServerConfig) -> Self {
        Self {
            factory,
            directory: Arc::new(ItemDirectory::new()),
            models: Arc::new(ModelRegistry::new()),
            relations: Arc::new(RelationCache::new()),
            bus: EventBus::with_capacity(config.bus_capacity),
            config,
        }
    }

    pub fn directory(&self) -> &Arc<ItemDirectory> {
        &self.directory
    }

    pub fn models(&self) -> &Arc<ModelRegistry> {
        &self.models
    }

    pub fn relations(&self) -> &Arc<RelationCache> {
        &self.relations
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Create, register and activate an item of a registered class.
    pub fn new_item(&self, class: &str, name: &str) -> Result<ItemId, HubError> {
        self.new_item_with_attributes(class, name, &[])
    }

    /// Create an item and apply attribute values during its construction
    /// window, so init-only attributes are reachable. The item is then
    /// registered, added to the relation cache and activated.
    pub fn new_item_with_attributes(
        &self,
        class: &str,
        name: &str,
        attributes: &[(&str, &str)],
    ) -> Result<ItemId, HubError> {
        let item = self.factory.create(class)?;
        let mut instance = ItemInstance::new(item);

        {
            let mut proxy = LocalItemProxy::open(&mut instance, &self.models)?;
            for (attribute, value) in attributes {
                if !proxy.set_attribute_value(attribute, value)? {
                    warn!(class, name, attribute, "configured attribute was not settable");
                }
            }
        }

        let id = self.directory.register(instance, name)?;
        if let Some(stored) = self.directory.get(id) {
            let model = self.models.model_for(stored.lock().item())?;
            self.relations.add_item(stored.clone(), model);
            stored.lock().activate();
        }

        info!(class, name, id, "created item");
        Ok(id)
    }

    /// Run a closure against an item's proxy.
    pub fn with_proxy<R>(
        &self,
        name_or_id: &str,
        f: impl FnOnce(&mut LocalItemProxy<'_>) -> R,
    ) -> Result<R, HubError> {
        let instance = self
            .directory
            .find(name_or_id)
            .ok_or_else(|| HubError::ItemNotFound(name_or_id.to_string()))?;
        let mut guard = instance.lock();
        let mut proxy = LocalItemProxy::open(&mut guard, &self.models)?;
        Ok(f(&mut proxy))
    }

    /// Read one attribute in its external string form.
    pub fn attribute_value(&self, name_or_id: &str, attribute: &str) -> Result<String, HubError> {
        self.with_proxy(name_or_id, |proxy| proxy.attribute_value(attribute))
    }

    /// Write one attribute. Illegal values propagate as [`HubError::Item`].
    pub fn set_attribute(
        &self,
        name_or_id: &str,
        attribute: &str,
        value: &str,
    ) -> Result<bool, HubError> {
        self.with_proxy(name_or_id, |proxy| proxy.set_attribute_value(attribute, value))?
            .map_err(HubError::from)
    }

    /// Invoke one action by name.
    pub fn call_action(&self, name_or_id: &str, action: &str) -> Result<String, HubError> {
        self.with_proxy(name_or_id, |proxy| proxy.call_action(action))?
            .map_err(HubError::from)
    }

    /// Remove an item from the directory and the relation cache.
    pub fn remove_item(&self, name_or_id: &str) -> Result<(), HubError> {
        let instance = self
            .directory
            .find(name_or_id)
            .ok_or_else(|| HubError::ItemNotFound(name_or_id.to_string()))?;
        let id = instance.lock().id();
        self.directory.remove(id);
        self.relations.remove_item(id);
        Ok(())
    }

    /// Ids of items whose relation attributes currently reference the target.
    pub fn related_to(&self, target: &str) -> Vec<ItemId> {
        self.relations.related_to(target)
    }

    /// Create all configured items. Failures are logged and skipped; returns
    /// how many items were created.
    pub fn boot(&self) -> usize {
        let mut created = 0;
        for item in &self.config.items {
            let attributes: Vec<(&str, &str)> = item
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            match self.new_item_with_attributes(&item.class, &item.name, &attributes) {
                Ok(_) => created += 1,
                Err(err) => {
                    error!(class = %item.class, name = %item.name, %err, "failed to create configured item");
                }
            }
        }
        created
    }

    /// Deliver one event to every hosted item. Returns how many consumed it.
    pub fn distribute(&self, event: &HomeEvent) -> usize {
        let mut consumed = 0;
        for id in self.directory.ids() {
            if let Some(instance) = self.directory.get(id) {
                if instance.lock().receive_event(event) {
                    consumed += 1;
                }
            }
        }
        debug!(event_type = event.event_type(), consumed, "distributed event");
        consumed
    }

    /// Start the background tasks: the event distribution loop and the
    /// periodic tick publisher.
    pub fn start(&self) -> ServerHandle {
        let directory = self.directory.clone();
        let mut receiver = self.bus.subscribe();
        let distributor = tokio::spawn(async move {
            while let Some((event, _meta)) = receiver.recv().await {
                for id in directory.ids() {
                    if let Some(instance) = directory.get(id) {
                        instance.lock().receive_event(&event);
                    }
                }
            }
        });

        let bus = self.bus.clone();
        let period = std::time::Duration::from_secs(self.config.tick_seconds.max(1));
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately; skip it
            // so ticks start one period after boot.
            interval.tick().await;
            loop {
                interval.tick().await;
                bus.publish_with_metadata(
                    HomeEvent::new(types::MINUTE),
                    EventMetadata::new("server"),
                )
                .await;
            }
        });

        info!("server started");
        ServerHandle {
            distributor,
            ticker,
        }
    }

    /// Stop background tasks and all items.
    pub fn shutdown(&self, handle: ServerHandle) {
        handle.abort();
        self.directory.stop_all();
        info!("server stopped");
    }
}

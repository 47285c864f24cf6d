use async_trait::async_trait;
use futures::future::join_all;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

pub mod api;

use crate::server::Server;
pub use api::*;

/// A trait for handling events dynamically.
///
/// This trait allows for handling events of any type that implements the `Event` trait.
#[async_trait]
pub trait DynEventHandler: Send + Sync {
    /// Asynchronously handles a dynamic event.
    async fn handle_dyn(&self, server: &Arc<Server>, event: &(dyn Event + Send + Sync));

    /// Asynchronously handles a blocking dynamic event.
    async fn handle_blocking_dyn(&self, server: &Arc<Server>, event: &mut (dyn Event + Send + Sync));

    /// Checks if the event handler is blocking.
    fn is_blocking(&self) -> bool;

    /// Retrieves the priority of the event handler.
    fn get_priority(&self) -> EventPriority;
}

/// A trait for handling specific events.
///
/// This trait allows for handling events of a specific type that implements the `Event` trait.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync {
    /// Asynchronously handles an event of type `E`.
    async fn handle(&self, _server: &Arc<Server>, _event: &E) {}

    /// Asynchronously handles a blocking event of type `E`. Blocking handlers may modify
    /// the event, e.g. cancel it.
    async fn handle_blocking(&self, _server: &Arc<Server>, _event: &mut E) {}
}

/// A struct representing a typed event handler.
///
/// This struct holds a reference to an event handler, its priority, and whether it is blocking.
struct TypedEventHandler<E, H>
where
    E: Event + Send + Sync + 'static,
    H: EventHandler<E> + Send + Sync,
{
    handler: Arc<H>,
    priority: EventPriority,
    blocking: bool,
    _phantom: std::marker::PhantomData<E>,
}

#[async_trait]
impl<E, H> DynEventHandler for TypedEventHandler<E, H>
where
    E: Event + Send + Sync + 'static,
    H: EventHandler<E> + Send + Sync,
{
    async fn handle_blocking_dyn(
        &self,
        server: &Arc<Server>,
        event: &mut (dyn Event + Send + Sync),
    ) {
        if let Some(event) = event.as_any_mut().downcast_mut::<E>() {
            self.handler.handle_blocking(server, event).await;
        }
    }

    async fn handle_dyn(&self, server: &Arc<Server>, event: &(dyn Event + Send + Sync)) {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            self.handler.handle(server, event).await;
        }
    }

    fn is_blocking(&self) -> bool {
        self.blocking
    }

    fn get_priority(&self) -> EventPriority {
        self.priority
    }
}

/// A type alias for a map of event handlers, where the key is a static string
/// and the value is a vector of dynamic event handlers.
type HandlerMap = HashMap<&'static str, Vec<Box<dyn DynEventHandler>>>;

/// Core plugin management system
pub struct PluginManager {
    plugins: Mutex<Vec<LoadedPlugin>>,
    handlers: Arc<RwLock<HandlerMap>>,
}

/// Represents a successfully registered plugin
struct LoadedPlugin {
    metadata: PluginMetadata<'static>,
    instance: Box<dyn Plugin>,
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Plugin initialization failed: {0}")]
    InitializationFailed(String),
}

/// Error types for plugin management
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("Plugin already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Loader error: {0}")]
    LoaderError(#[from] LoaderError),
}

impl Default for PluginManager {
    fn default() -> Self {
        Self {
            plugins: Mutex::new(Vec::new()),
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl PluginManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin and runs its `on_load` hook
    pub async fn register_plugin(
        &self,
        server: &Arc<Server>,
        metadata: PluginMetadata<'static>,
        mut instance: Box<dyn Plugin>,
    ) -> Result<(), ManagerError> {
        if self.is_plugin_loaded(metadata.name).await {
            return Err(ManagerError::AlreadyLoaded(metadata.name.to_string()));
        }

        let context = Context::new(
            metadata.clone(),
            Arc::clone(server),
            Arc::clone(&self.handlers),
        );

        if let Err(e) = instance.on_load(&context).await {
            log::error!("Failed to load plugin {}: {}", metadata.name, e);
            let _ = instance.on_unload(&context).await;
            return Err(ManagerError::LoaderError(LoaderError::InitializationFailed(
                e,
            )));
        }

        log::info!("Loaded plugin {} {}", metadata.name, metadata.version);
        self.plugins
            .lock()
            .await
            .push(LoadedPlugin { metadata, instance });
        Ok(())
    }

    /// Checks if plugin loaded
    pub async fn is_plugin_loaded(&self, name: &str) -> bool {
        self.plugins
            .lock()
            .await
            .iter()
            .any(|p| p.metadata.name == name)
    }

    /// Get list of loaded plugins
    pub async fn loaded_plugins(&self) -> Vec<PluginMetadata<'static>> {
        self.plugins
            .lock()
            .await
            .iter()
            .map(|p| p.metadata.clone())
            .collect()
    }

    /// Unload a plugin by name
    pub async fn unload_plugin(&self, server: &Arc<Server>, name: &str) -> Result<(), ManagerError> {
        let mut plugin = {
            let mut plugins = self.plugins.lock().await;
            let index = plugins
                .iter()
                .position(|p| p.metadata.name == name)
                .ok_or_else(|| ManagerError::PluginNotFound(name.to_string()))?;
            plugins.remove(index)
        };

        let context = Context::new(
            plugin.metadata.clone(),
            Arc::clone(server),
            Arc::clone(&self.handlers),
        );

        if let Err(e) = plugin.instance.on_unload(&context).await {
            log::warn!("Plugin {name} failed to unload cleanly: {e}");
        }
        Ok(())
    }

    /// Register an event handler
    pub async fn register<E, H>(&self, handler: Arc<H>, priority: EventPriority, blocking: bool)
    where
        E: Event + Send + Sync + 'static,
        H: EventHandler<E> + 'static,
    {
        let mut handlers = self.handlers.write().await;
        let typed_handler = TypedEventHandler {
            handler,
            priority,
            blocking,
            _phantom: std::marker::PhantomData,
        };

        handlers
            .entry(E::get_name_static())
            .or_default()
            .push(Box::new(typed_handler));
    }

    /// Fire an event to all registered handlers.
    ///
    /// Blocking handlers run first, one after another from the lowest to the highest priority.
    /// Non-blocking handlers then run concurrently on the final event.
    pub async fn fire<E: Event + Send + Sync + 'static>(
        &self,
        server: &Arc<Server>,
        mut event: E,
    ) -> E {
        let handlers = self.handlers.read().await;
        if let Some(handlers) = handlers.get(&E::get_name_static()) {
            let (mut blocking, non_blocking): (Vec<_>, Vec<_>) =
                handlers.iter().partition(|h| h.is_blocking());
            blocking.sort_by_key(|h| h.get_priority());

            // Process blocking handlers first
            for handler in blocking {
                handler.handle_blocking_dyn(server, &mut event).await;
            }

            // Process non-blocking handlers
            join_all(
                non_blocking
                    .into_iter()
                    .map(|h| h.handle_dyn(server, &event)),
            )
            .await;
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use gourd_macros::send_cancellable;
    use gourd_util::math::vector2::Vector2;

    use super::{world::chunk_unload::ChunkUnload, EventHandler, EventPriority};
    use crate::{server::Server, test_server};

    struct Cancel;

    #[async_trait]
    impl EventHandler<ChunkUnload> for Cancel {
        async fn handle_blocking(&self, _server: &Arc<Server>, event: &mut ChunkUnload) {
            event.cancelled = true;
        }
    }

    // Labels of the branches must not reach the expanded code
    #[tokio::test]
    #[deny(unused_labels)]
    async fn send_cancellable_runs_one_branch() {
        let server = test_server();
        let world = server.default_world();
        let data = world.receive_chunk(Vector2::new(0, 0)).await.unwrap();

        let mut branches = Vec::new();
        for cancel in [false, true] {
            if cancel {
                server
                    .plugin_manager
                    .register::<ChunkUnload, _>(Arc::new(Cancel), EventPriority::Normal, true)
                    .await;
            }
            send_cancellable! {{
                server;
                ChunkUnload::new(world.clone(), world.get_chunk_at(0, 0), data.clone(), true);

                'after: {
                    branches.push(("after", event.save));
                }

                'cancelled: {
                    branches.push(("cancelled", event.save));
                }
            }}
        }
        assert_eq!(branches, vec![("after", true), ("cancelled", true)]);
    }
}

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    plugin::{EventHandler, HandlerMap, TypedEventHandler},
    server::Server,
    world::World,
};

use super::{Event, EventPriority, PluginMetadata};

/// The `Context` struct represents the context of a plugin, containing metadata,
/// a server reference, and event handlers.
pub struct Context {
    metadata: PluginMetadata<'static>,
    pub server: Arc<Server>,
    handlers: Arc<RwLock<HandlerMap>>,
}

impl Context {
    #[must_use]
    pub fn new(
        metadata: PluginMetadata<'static>,
        server: Arc<Server>,
        handlers: Arc<RwLock<HandlerMap>>,
    ) -> Self {
        Self {
            metadata,
            server,
            handlers,
        }
    }

    pub fn metadata(&self) -> &PluginMetadata<'static> {
        &self.metadata
    }

    pub async fn get_world(&self, name: &str) -> Option<Arc<World>> {
        self.server.get_world(name).await
    }

    /// Asynchronously registers an event handler for a specific event type.
    ///
    /// # Arguments
    /// - `handler`: A reference to the event handler.
    /// - `priority`: The priority of the event handler.
    /// - `blocking`: Blocking handlers run one after another and may modify the event.
    pub async fn register_event<E: Event + 'static, H>(
        &self,
        handler: Arc<H>,
        priority: EventPriority,
        blocking: bool,
    ) where
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
}

use std::sync::Arc;

use gourd_config::BasicConfiguration;
use gourd_world::{generation::Seed, level::Level, store::MemoryChunkStore};
use tokio::sync::RwLock;

use crate::{
    plugin::{ChunkError, PluginManager},
    world::World,
};

/// Holds the worlds and the plugin manager firing events about them
pub struct Server {
    pub basic_config: BasicConfiguration,
    /// Every world of the server, the default one first
    worlds: RwLock<Vec<Arc<World>>>,
    default_world: Arc<World>,
    pub plugin_manager: PluginManager,
}

impl Server {
    /// Creates a server with a single default world kept in memory
    #[must_use]
    pub fn new(basic_config: BasicConfiguration) -> Arc<Self> {
        Arc::new_cyclic(|server| {
            let seed = basic_config.world_seed();
            let level = Level::new(Seed::from(seed), Arc::new(MemoryChunkStore::new()));
            let default_world = Arc::new(World::load(
                basic_config.default_level_name.clone(),
                seed,
                level,
                basic_config.simulation_distance,
                server.clone(),
            ));
            log::info!(
                "Created world {} with seed {seed}",
                basic_config.default_level_name
            );

            Self {
                basic_config,
                worlds: RwLock::new(vec![default_world.clone()]),
                default_world,
                plugin_manager: PluginManager::new(),
            }
        })
    }

    pub fn default_world(&self) -> Arc<World> {
        self.default_world.clone()
    }

    pub async fn get_world(&self, name: &str) -> Option<Arc<World>> {
        self.worlds
            .read()
            .await
            .iter()
            .find(|world| world.name == name)
            .cloned()
    }

    pub async fn worlds(&self) -> Vec<Arc<World>> {
        self.worlds.read().await.clone()
    }

    /// Adds another world backed by `level`. Returns `None` if the name is taken.
    pub async fn add_world(
        self: &Arc<Self>,
        name: &str,
        seed: i64,
        level: Level,
    ) -> Option<Arc<World>> {
        let mut worlds = self.worlds.write().await;
        if worlds.iter().any(|world| world.name == name) {
            log::warn!("A world named {name} already exists");
            return None;
        }
        let world = Arc::new(World::load(
            name.to_string(),
            seed,
            level,
            self.basic_config.simulation_distance,
            Arc::downgrade(self),
        ));
        worlds.push(world.clone());
        Some(world)
    }

    /// Runs one tick of every world
    pub async fn tick(&self) {
        for world in self.worlds().await {
            let ticked = world.tick().await;
            log::trace!("Ticked {ticked} chunks of {}", world.name);
        }
    }

    pub async fn save(&self) -> Result<(), ChunkError> {
        for world in self.worlds().await {
            world.save().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use gourd_world::{generation::Seed, level::Level, store::MemoryChunkStore};

    use crate::{
        plugin::{
            world::chunk_load::ChunkLoad, Chunk, Context, EventHandler, EventPriority,
            ManagerError, Plugin, PluginMetadata,
        },
        test_server,
    };

    use super::Server;

    const METADATA: PluginMetadata<'static> = PluginMetadata {
        name: "chunk-watch",
        version: "0.1.0",
        authors: "gourd",
        description: "Counts loaded chunks",
    };

    struct Counter(AtomicUsize);

    #[async_trait]
    impl EventHandler<ChunkLoad> for Counter {
        async fn handle_blocking(&self, _server: &Arc<Server>, _event: &mut ChunkLoad) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ChunkWatch {
        counter: Arc<Counter>,
        unloaded: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Plugin for ChunkWatch {
        async fn on_load(&mut self, context: &Context) -> Result<(), String> {
            context
                .register_event::<ChunkLoad, _>(self.counter.clone(), EventPriority::Normal, true)
                .await;
            Ok(())
        }

        async fn on_unload(&mut self, _context: &Context) -> Result<(), String> {
            self.unloaded.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Plugin for Broken {
        async fn on_load(&mut self, _context: &Context) -> Result<(), String> {
            Err("missing world".to_string())
        }
    }

    #[tokio::test]
    async fn plugin_lifecycle() {
        let server = test_server();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let unloaded = Arc::new(AtomicUsize::new(0));
        let plugin = || {
            Box::new(ChunkWatch {
                counter: counter.clone(),
                unloaded: unloaded.clone(),
            })
        };

        server
            .plugin_manager
            .register_plugin(&server, METADATA, plugin())
            .await
            .unwrap();
        assert!(server.plugin_manager.is_plugin_loaded("chunk-watch").await);
        assert!(matches!(
            server
                .plugin_manager
                .register_plugin(&server, METADATA, plugin())
                .await,
            Err(ManagerError::AlreadyLoaded(_))
        ));

        server.default_world().get_chunk_at(0, 0).load().await.unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        server
            .plugin_manager
            .unload_plugin(&server, "chunk-watch")
            .await
            .unwrap();
        assert_eq!(unloaded.load(Ordering::SeqCst), 1);
        assert!(server.plugin_manager.loaded_plugins().await.is_empty());
        assert!(matches!(
            server.plugin_manager.unload_plugin(&server, "chunk-watch").await,
            Err(ManagerError::PluginNotFound(_))
        ));
    }

    #[tokio::test]
    async fn failing_plugin_is_not_loaded() {
        let server = test_server();
        let metadata = PluginMetadata {
            name: "broken",
            ..METADATA
        };
        assert!(matches!(
            server
                .plugin_manager
                .register_plugin(&server, metadata, Box::new(Broken))
                .await,
            Err(ManagerError::LoaderError(_))
        ));
        assert!(!server.plugin_manager.is_plugin_loaded("broken").await);
    }

    #[tokio::test]
    async fn worlds_by_name() {
        let server = test_server();
        assert!(server.get_world("world").await.is_some());
        assert!(server.get_world("nether").await.is_none());

        let level = Level::new(Seed(7), Arc::new(MemoryChunkStore::new()));
        let nether = server.add_world("nether", 7, level).await.unwrap();
        assert_eq!(nether.seed, 7);
        assert!(Arc::ptr_eq(
            &server.get_world("nether").await.unwrap(),
            &nether
        ));
        let level = Level::new(Seed(7), Arc::new(MemoryChunkStore::new()));
        assert!(server.add_world("nether", 7, level).await.is_none());

        // The world knows its server
        assert!(Arc::ptr_eq(&nether.server().unwrap(), &server));

        let chunk = nether.get_chunk_at(0, 0);
        chunk.load().await.unwrap();
        chunk.set_sticky(true);
        server.tick().await;
        server.save().await.unwrap();
        assert!(nether.level.chunk_store().has_chunk(chunk.position()).await);
        assert!(!server
            .default_world()
            .level
            .chunk_store()
            .has_chunk(chunk.position())
            .await);
    }
}

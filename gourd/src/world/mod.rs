use std::{collections::HashMap, num::NonZeroU8, sync::Arc, sync::Weak};

use gourd_macros::send_cancellable;
use gourd_util::math::{position::BlockPos, vector2::Vector2, vector3::Vector3};
use gourd_world::{
    block::BlockState,
    level::{Level, SyncChunk},
    watch_area::WatchArea,
};
use tokio::sync::RwLock;

use crate::{
    entity::Entity,
    plugin::{
        world::{chunk_load::ChunkLoad, chunk_unload::ChunkUnload},
        ChunkError,
    },
    server::Server,
};

pub mod block;
pub mod chunk;

use block::Block;
use chunk::WorldChunk;

/// A world and the entities living in it. Chunks are kept by its `Level`.
pub struct World {
    pub name: String,
    /// Numeric world seed, also deciding slime chunks
    pub seed: i64,
    /// The underlying level, responsible for chunk management and terrain generation.
    pub level: Arc<Level>,
    /// All entities of this world, keyed by their unique UUID.
    pub entities: Arc<RwLock<HashMap<uuid::Uuid, Arc<Entity>>>>,
    /// Radius in chunks around observers in which chunks are watched
    pub simulation_distance: NonZeroU8,
    server: Weak<Server>,
}

impl World {
    #[must_use]
    pub fn load(
        name: String,
        seed: i64,
        level: Level,
        simulation_distance: NonZeroU8,
        server: Weak<Server>,
    ) -> Self {
        Self {
            name,
            seed,
            level: Arc::new(level),
            entities: Arc::new(RwLock::new(HashMap::new())),
            simulation_distance,
            server,
        }
    }

    pub fn server(&self) -> Option<Arc<Server>> {
        self.server.upgrade()
    }

    /// Handle of the chunk at the given grid position. Does not load it.
    pub fn get_chunk_at(self: &Arc<Self>, x: i32, z: i32) -> WorldChunk {
        WorldChunk::new(self.clone(), Vector2::new(x, z))
    }

    pub fn get_block(self: &Arc<Self>, position: BlockPos) -> Block {
        Block::new(self.clone(), position)
    }

    pub async fn save(&self) -> Result<(), ChunkError> {
        log::info!("Saving world {}", self.name);
        Ok(self.level.save().await?)
    }

    /// Brings a chunk into memory and fires `ChunkLoad` if it was not loaded before.
    /// Returns `None` when the chunk does not exist and `generate` is unset.
    pub async fn fetch_chunk(
        self: &Arc<Self>,
        at: Vector2<i32>,
        generate: bool,
    ) -> Result<Option<SyncChunk>, ChunkError> {
        if let Some(chunk) = self.level.try_get_chunk(&at) {
            return Ok(Some(chunk));
        }

        let Some(loaded) = self.level.load_chunk(at, generate).await? else {
            return Ok(None);
        };
        if !loaded.inserted {
            // Another task brought it into memory and fires the event
            return Ok(Some(loaded.chunk));
        }
        log::debug!("Loaded chunk {at} in {} (new: {})", self.name, loaded.is_new);

        if let Some(server) = self.server() {
            let event = ChunkLoad::new(
                self.clone(),
                self.get_chunk_at(at.x, at.z),
                loaded.chunk.clone(),
                loaded.is_new,
            );
            server.plugin_manager.fire(&server, event).await;
        }
        Ok(Some(loaded.chunk))
    }

    /// Like `fetch_chunk`, always generating missing chunks
    pub async fn receive_chunk(self: &Arc<Self>, at: Vector2<i32>) -> Result<SyncChunk, ChunkError> {
        self.fetch_chunk(at, true)
            .await?
            .ok_or(ChunkError::Reading(gourd_world::chunk::ChunkReadingError::ChunkNotExist))
    }

    /// Removes a chunk from memory.
    ///
    /// Returns whether the chunk is unloaded afterwards: a chunk that is not loaded counts as
    /// unloaded, a `safe` unload refuses watched chunks and plugins may cancel the unload.
    pub async fn unload_chunk(
        self: &Arc<Self>,
        at: Vector2<i32>,
        save: bool,
        safe: bool,
    ) -> Result<bool, ChunkError> {
        let Some(chunk) = self.level.try_get_chunk(&at) else {
            return Ok(true);
        };
        if safe && self.level.is_chunk_watched(&at) {
            log::debug!("Not unloading chunk {at}, it is watched");
            return Ok(false);
        }

        let Some(server) = self.server() else {
            self.level.remove_chunk(at, save).await?;
            return Ok(true);
        };

        let mut unloaded = false;
        send_cancellable! {{
            server;
            ChunkUnload::new(self.clone(), self.get_chunk_at(at.x, at.z), chunk, save);

            'after: {
                self.level.remove_chunk(at, event.save).await?;
                unloaded = true;
            }

            'cancelled: {
                log::debug!("Unloading chunk {at} was cancelled");
            }
        }}
        Ok(unloaded)
    }

    /// Unloads every loaded chunk no observer watches, sticky ones included.
    /// Returns how many chunks were unloaded.
    pub async fn unload_unused_chunks(self: &Arc<Self>) -> usize {
        let mut unloaded = 0;
        for at in self.level.unwatched_chunks() {
            match self.unload_chunk(at, true, true).await {
                Ok(true) => unloaded += 1,
                Ok(false) => {}
                Err(error) => log::error!("Failed to unload chunk {at}: {error}"),
            }
        }
        unloaded
    }

    /// Runs one tick of the world. Returns the number of chunks that were ticked.
    pub async fn tick(&self) -> usize {
        self.level.tick_chunks().await
    }

    pub async fn get_block_state_id(self: &Arc<Self>, position: &BlockPos) -> Result<u16, ChunkError> {
        let (chunk, relative) = position.chunk_and_chunk_relative_position();
        let chunk = self.receive_chunk(chunk).await?;
        let chunk = chunk.read().await;
        chunk
            .get_block_state_id(relative.x, relative.y, relative.z)
            .ok_or(ChunkError::OutOfWorld(*position))
    }

    pub async fn get_block_state(self: &Arc<Self>, position: &BlockPos) -> Result<BlockState, ChunkError> {
        let id = self.get_block_state_id(position).await?;
        BlockState::from_state_id(id).ok_or(ChunkError::UnknownState(id))
    }

    /// Sets a block, returning the replaced state
    pub async fn set_block_state(
        self: &Arc<Self>,
        position: &BlockPos,
        block_state_id: u16,
    ) -> Result<u16, ChunkError> {
        if BlockState::from_state_id(block_state_id).is_none() {
            return Err(ChunkError::UnknownState(block_state_id));
        }
        let (chunk, relative) = position.chunk_and_chunk_relative_position();
        let chunk = self.receive_chunk(chunk).await?;
        let mut chunk = chunk.write().await;
        chunk
            .set_block_state(relative.x, relative.y, relative.z, block_state_id)
            .ok_or(ChunkError::OutOfWorld(*position))
    }

    /// Adds an entity to the world. Observers start watching the chunks around them,
    /// which loads those chunks.
    pub async fn spawn_entity(self: &Arc<Self>, entity: Arc<Entity>) -> Result<(), ChunkError> {
        self.entities
            .write()
            .await
            .insert(entity.entity_uuid, entity.clone());

        if entity.entity_type.is_observer() {
            let area = WatchArea::new(entity.chunk_pos.load(), self.simulation_distance);
            entity.watch_area.store(Some(area));

            let chunks = area.chunks();
            self.level.mark_chunks_as_newly_watched(&chunks);
            for chunk in chunks {
                self.receive_chunk(chunk).await?;
            }
        }
        Ok(())
    }

    /// Moves an entity. Observers update the chunks they watch, loading the ones that came
    /// into range. Chunks that left the range stay loaded until they are unloaded.
    pub async fn move_entity(
        self: &Arc<Self>,
        entity: &Arc<Entity>,
        position: Vector3<f64>,
    ) -> Result<(), ChunkError> {
        entity.set_pos(position);

        let Some(old_area) = entity.watch_area.load() else {
            return Ok(());
        };
        let new_area = WatchArea::new(entity.chunk_pos.load(), self.simulation_distance);
        if old_area == new_area {
            return Ok(());
        }

        let mut loading_chunks = Vec::new();
        let mut unloading_chunks = Vec::new();
        WatchArea::diff(
            old_area,
            new_area,
            |chunk_pos| loading_chunks.push(chunk_pos),
            |chunk_pos| unloading_chunks.push(chunk_pos),
        );
        entity.watch_area.store(Some(new_area));

        self.level.mark_chunks_as_newly_watched(&loading_chunks);
        let unwatched = self.level.mark_chunks_as_not_watched(&unloading_chunks);
        log::trace!(
            "Entity {} watches {} new chunks, {} chunks lost all watchers",
            entity.entity_id,
            loading_chunks.len(),
            unwatched.len()
        );

        for chunk in loading_chunks {
            self.receive_chunk(chunk).await?;
        }
        Ok(())
    }

    /// Removes an entity from the world. Returns whether it was part of it.
    pub async fn remove_entity(&self, entity: &Entity) -> bool {
        let removed = self
            .entities
            .write()
            .await
            .remove(&entity.entity_uuid)
            .is_some();

        if let Some(area) = entity.watch_area.take() {
            self.level.mark_chunks_as_not_watched(&area.chunks());
        }
        removed
    }

    /// Entities whose block position lies in the given chunk
    pub async fn entities_in_chunk(&self, chunk: Vector2<i32>) -> Vec<Arc<Entity>> {
        self.entities
            .read()
            .await
            .values()
            .filter(|entity| entity.chunk_pos.load() == chunk)
            .cloned()
            .collect()
    }
}

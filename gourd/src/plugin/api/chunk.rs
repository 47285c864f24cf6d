use std::sync::Arc;

use async_trait::async_trait;
use gourd_util::math::{position::BlockPos, vector2::Vector2};
use gourd_world::{
    block::entities::BlockEntity,
    chunk::{snapshot::ChunkSnapshot, ChunkReadingError, ChunkWritingError},
};
use thiserror::Error;

use crate::{
    entity::Entity,
    world::{block::Block, World},
};

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("Block {x} {y} {z} is outside of the chunk")]
    OutOfBounds { x: i32, y: i32, z: i32 },
    #[error("Block {0} is outside of the world")]
    OutOfWorld(BlockPos),
    #[error("Unknown block state {0}")]
    UnknownState(u16),
    #[error("Failed to load chunk: {0}")]
    Reading(#[from] ChunkReadingError),
    #[error("Failed to save chunk: {0}")]
    Writing(#[from] ChunkWritingError),
}

/// A 16 by 16 column of blocks spanning the whole height of a world.
///
/// Handles are cheap and stay valid across loads and unloads of the chunk they point to.
#[async_trait]
pub trait Chunk: Send + Sync {
    /// X coordinate on the chunk grid
    fn x(&self) -> i32;

    /// Z coordinate on the chunk grid
    fn z(&self) -> i32;

    fn position(&self) -> Vector2<i32> {
        Vector2::new(self.x(), self.z())
    }

    fn world(&self) -> Arc<World>;

    /// The block at chunk relative `x` and `z` (`0..16`) and absolute `y`.
    fn block(&self, x: i32, y: i32, z: i32) -> Result<Block, ChunkError>;

    /// A thread safe read-only copy of the chunk including the highest block of every column.
    async fn snapshot(&self) -> Result<ChunkSnapshot, ChunkError> {
        self.snapshot_with(true, false, false).await
    }

    /// A thread safe read-only copy of the chunk.
    ///
    /// # Arguments
    /// - `include_max_y`: copy the highest block of every column.
    /// - `include_biome`: copy the biome of every cell.
    /// - `include_biome_climate`: copy the raw temperature and rainfall of every cell.
    async fn snapshot_with(
        &self,
        include_max_y: bool,
        include_biome: bool,
        include_biome_climate: bool,
    ) -> Result<ChunkSnapshot, ChunkError>;

    /// Entities standing in this chunk
    async fn entities(&self) -> Vec<Arc<Entity>>;

    /// Tile entities of this chunk
    async fn tile_entities(&self) -> Result<Vec<Arc<dyn BlockEntity>>, ChunkError>;

    fn is_loaded(&self) -> bool;

    /// Loads the chunk, generating it if it does not exist yet.
    async fn load(&self) -> Result<bool, ChunkError> {
        self.load_with(true).await
    }

    /// Loads the chunk.
    ///
    /// Returns whether the chunk is loaded afterwards. Without `generate` a chunk that was
    /// never stored stays unloaded.
    async fn load_with(&self, generate: bool) -> Result<bool, ChunkError>;

    /// Unloads and saves the chunk, unless an observer watches it.
    async fn unload(&self) -> Result<bool, ChunkError> {
        self.unload_with_save(true).await
    }

    /// Unloads the chunk, unless an observer watches it.
    ///
    /// Returns whether the chunk is unloaded afterwards.
    async fn unload_with_save(&self, save: bool) -> Result<bool, ChunkError>;

    /// Unloads the chunk. With `safe` unset the chunk is unloaded even while observers
    /// watch it.
    #[deprecated(note = "it is never safe to remove a chunk in use, use `unload_with_save`")]
    async fn unload_with(&self, save: bool, safe: bool) -> Result<bool, ChunkError>;

    /// Whether slimes can spawn in this chunk outside of swamps
    fn is_slime_chunk(&self) -> bool;

    /// Sticky chunks keep receiving ticks while loaded even when no observer is near.
    /// They are still unloaded like any other chunk.
    fn set_sticky(&self, sticky: bool);

    fn is_sticky(&self) -> bool;
}

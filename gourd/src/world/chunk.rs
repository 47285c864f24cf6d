use std::sync::Arc;

use async_trait::async_trait;
use gourd_util::math::{position::BlockPos, vector2::Vector2};
use gourd_world::{
    block::entities::BlockEntity,
    chunk::snapshot::{ChunkSnapshot, SnapshotOptions},
    slime::is_slime_chunk,
    WORLD_LOWEST_Y, WORLD_MAX_Y,
};

use crate::{
    entity::Entity,
    plugin::{Chunk, ChunkError},
};

use super::{block::Block, World};

/// Handle of a chunk position in a world. The chunk itself may or may not be loaded.
#[derive(Clone)]
pub struct WorldChunk {
    world: Arc<World>,
    position: Vector2<i32>,
}

impl WorldChunk {
    pub fn new(world: Arc<World>, position: Vector2<i32>) -> Self {
        Self { world, position }
    }
}

impl PartialEq for WorldChunk {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.world, &other.world) && self.position == other.position
    }
}

impl Eq for WorldChunk {}

impl std::fmt::Debug for WorldChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldChunk")
            .field("world", &self.world.name)
            .field("position", &self.position)
            .finish()
    }
}

#[async_trait]
impl Chunk for WorldChunk {
    fn x(&self) -> i32 {
        self.position.x
    }

    fn z(&self) -> i32 {
        self.position.z
    }

    fn world(&self) -> Arc<World> {
        self.world.clone()
    }

    fn block(&self, x: i32, y: i32, z: i32) -> Result<Block, ChunkError> {
        if !(0..16).contains(&x)
            || !(0..16).contains(&z)
            || !(WORLD_LOWEST_Y as i32..WORLD_MAX_Y as i32).contains(&y)
        {
            return Err(ChunkError::OutOfBounds { x, y, z });
        }
        Ok(self
            .world
            .get_block(BlockPos::from_chunk_relative(self.position, x, y, z)))
    }

    async fn snapshot_with(
        &self,
        include_max_y: bool,
        include_biome: bool,
        include_biome_climate: bool,
    ) -> Result<ChunkSnapshot, ChunkError> {
        let options = SnapshotOptions {
            include_max_y,
            include_biome,
            include_biome_climate,
        };
        let chunk = self.world.receive_chunk(self.position).await?;
        let chunk = chunk.read().await;
        Ok(ChunkSnapshot::capture(
            &chunk,
            &self.world.name,
            self.world.level.world_age(),
            options,
        ))
    }

    async fn entities(&self) -> Vec<Arc<Entity>> {
        self.world.entities_in_chunk(self.position).await
    }

    async fn tile_entities(&self) -> Result<Vec<Arc<dyn BlockEntity>>, ChunkError> {
        let chunk = self.world.receive_chunk(self.position).await?;
        let chunk = chunk.read().await;
        Ok(chunk.block_entities.values().cloned().collect())
    }

    fn is_loaded(&self) -> bool {
        self.world.level.is_chunk_loaded(&self.position)
    }

    async fn load_with(&self, generate: bool) -> Result<bool, ChunkError> {
        Ok(self
            .world
            .fetch_chunk(self.position, generate)
            .await?
            .is_some())
    }

    async fn unload_with_save(&self, save: bool) -> Result<bool, ChunkError> {
        self.world.unload_chunk(self.position, save, true).await
    }

    async fn unload_with(&self, save: bool, safe: bool) -> Result<bool, ChunkError> {
        self.world.unload_chunk(self.position, save, safe).await
    }

    fn is_slime_chunk(&self) -> bool {
        is_slime_chunk(self.world.seed, self.position)
    }

    fn set_sticky(&self, sticky: bool) {
        self.world.level.set_sticky(self.position, sticky);
    }

    fn is_sticky(&self) -> bool {
        self.world.level.is_sticky(&self.position)
    }
}

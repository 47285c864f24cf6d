use std::sync::Arc;

use gourd_util::math::position::BlockPos;
use gourd_world::block::{entities::BlockEntity, BlockState};

use crate::plugin::ChunkError;

use super::{chunk::WorldChunk, World};

/// Handle of a single block position in a world
#[derive(Clone)]
pub struct Block {
    world: Arc<World>,
    position: BlockPos,
}

impl Block {
    pub fn new(world: Arc<World>, position: BlockPos) -> Self {
        Self { world, position }
    }

    pub fn position(&self) -> BlockPos {
        self.position
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn x(&self) -> i32 {
        self.position.0.x
    }

    pub fn y(&self) -> i32 {
        self.position.0.y
    }

    pub fn z(&self) -> i32 {
        self.position.0.z
    }

    /// The chunk this block belongs to
    pub fn chunk(&self) -> WorldChunk {
        let chunk = self.position.chunk_position();
        self.world.get_chunk_at(chunk.x, chunk.z)
    }

    pub async fn state(&self) -> Result<BlockState, ChunkError> {
        self.world.get_block_state(&self.position).await
    }

    pub async fn block_type(&self) -> Result<&'static gourd_world::block::Block, ChunkError> {
        Ok(self.state().await?.block)
    }

    /// Replaces the block, returning the previous state
    pub async fn set_state(&self, state: BlockState) -> Result<BlockState, ChunkError> {
        let old = self
            .world
            .set_block_state(&self.position, state.state_id)
            .await?;
        BlockState::from_state_id(old).ok_or(ChunkError::UnknownState(old))
    }

    pub async fn block_entity(&self) -> Result<Option<Arc<dyn BlockEntity>>, ChunkError> {
        let chunk = self.world.receive_chunk(self.position.chunk_position()).await?;
        let chunk = chunk.read().await;
        Ok(chunk.block_entity(&self.position))
    }
}

#[cfg(test)]
mod tests {
    use gourd_util::math::position::BlockPos;
    use gourd_world::block::{entities::ChestBlockEntity, BlockState};

    use crate::{plugin::Chunk, test_server};

    #[tokio::test]
    async fn state_of_generated_terrain() {
        let server = test_server();
        let world = server.default_world();

        let block = world.get_block(BlockPos::new(3, -64, -20));
        assert_eq!(block.block_type().await.unwrap().name, "bedrock");
        let above = world.get_block(BlockPos::new(3, -61, -20));
        assert_eq!(above.block_type().await.unwrap().name, "grass_block");
        assert!(world
            .get_block(BlockPos::new(3, 0, -20))
            .state()
            .await
            .unwrap()
            .is_air());

        let chunk = block.chunk();
        assert_eq!((chunk.x(), chunk.z()), (0, -2));
    }

    #[tokio::test]
    async fn set_state_places_tile_entity() {
        let server = test_server();
        let world = server.default_world();
        let block = world.get_block(BlockPos::new(-1, 10, 5));

        let chest = BlockState::from_state_id(gourd_world::block::Block::CHEST.default_state_id())
            .unwrap();
        let old = block.set_state(chest).await.unwrap();
        assert!(old.is_air());
        assert_eq!(block.block_type().await.unwrap().name, "chest");

        let entity = block.block_entity().await.unwrap().unwrap();
        assert_eq!(entity.identifier(), ChestBlockEntity::ID);
        assert_eq!(entity.get_position(), block.position());

        block.set_state(BlockState::AIR).await.unwrap();
        assert!(block.block_entity().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn out_of_world() {
        let server = test_server();
        let world = server.default_world();
        assert!(world.get_block(BlockPos::new(0, 320, 0)).state().await.is_err());
        assert!(world.get_block(BlockPos::new(0, -65, 0)).state().await.is_err());
    }
}

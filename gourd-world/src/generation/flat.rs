use gourd_config::chunk::ChunkConfig;
use gourd_util::math::vector2::Vector2;

use super::{GeneratorInit, Seed, WorldGenerator};
use crate::{
    biome::Biome,
    block::Block,
    chunk::{ChunkData, CHUNK_WIDTH},
    WORLD_LOWEST_Y, WORLD_MAX_Y,
};

/// Stacks the configured layers from the bottom of the world upwards.
pub struct FlatGenerator {
    /// State id of every y level, starting at `WORLD_LOWEST_Y`
    column: Vec<u16>,
}

impl GeneratorInit for FlatGenerator {
    fn new(_seed: Seed, config: &ChunkConfig) -> Self {
        let mut column = Vec::new();
        for layer in &config.flat_layers {
            let state = match Block::from_name(&layer.block) {
                Some(block) => block.default_state_id(),
                None => {
                    log::warn!("Unknown flat layer block {}, using air", layer.block);
                    Block::AIR.default_state_id()
                }
            };
            column.extend(std::iter::repeat_n(state, layer.height as usize));
        }
        column.truncate((WORLD_MAX_Y - WORLD_LOWEST_Y) as usize);
        Self { column }
    }
}

impl WorldGenerator for FlatGenerator {
    fn generate_chunk(&self, at: Vector2<i32>) -> ChunkData {
        let mut chunk = ChunkData::new(at);
        chunk.fill_biome(Biome::PLAINS.id);
        for (offset, state) in self.column.iter().enumerate() {
            let y = WORLD_LOWEST_Y as i32 + offset as i32;
            for z in 0..CHUNK_WIDTH as i32 {
                for x in 0..CHUNK_WIDTH as i32 {
                    chunk.set_block_state(x, y, z, *state);
                }
            }
        }
        chunk.dirty = true;
        chunk
    }
}

/// Generates chunks holding only air.
pub struct VoidGenerator;

impl GeneratorInit for VoidGenerator {
    fn new(_seed: Seed, _config: &ChunkConfig) -> Self {
        Self
    }
}

impl WorldGenerator for VoidGenerator {
    fn generate_chunk(&self, at: Vector2<i32>) -> ChunkData {
        let mut chunk = ChunkData::new(at);
        chunk.dirty = true;
        chunk
    }
}

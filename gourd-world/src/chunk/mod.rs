use std::{collections::HashMap, sync::Arc};

use gourd_util::math::{position::BlockPos, vector2::Vector2};
use palette::{BiomePalette, BlockPalette};
use rand::Rng;
use thiserror::Error;

use crate::{
    block::{entities::block_entity_for_state, entities::BlockEntity, BlockState},
    WORLD_HEIGHT, WORLD_LOWEST_Y,
};

pub mod palette;
pub mod snapshot;

pub const CHUNK_WIDTH: usize = BlockPalette::SIZE;
pub const CHUNK_AREA: usize = CHUNK_WIDTH * CHUNK_WIDTH;
pub const BIOME_VOLUME: usize = BiomePalette::VOLUME;
pub const SUBCHUNK_VOLUME: usize = CHUNK_AREA * 16;
pub const SUBCHUNKS_COUNT: usize = WORLD_HEIGHT / 16;
pub const CHUNK_VOLUME: usize = CHUNK_AREA * WORLD_HEIGHT;

#[derive(Error, Debug)]
pub enum ChunkReadingError {
    #[error("Tried to read chunk which does not exist")]
    ChunkNotExist,
    #[error("Chunk store failed to read: {0}")]
    Store(String),
    #[error("Chunk generation did not finish")]
    GenerationFailed,
}

#[derive(Error, Debug)]
pub enum ChunkWritingError {
    #[error("Chunk store failed to write: {0}")]
    Store(String),
}

/// One 16 block high slice of a chunk
#[derive(Debug, Default, Clone)]
pub struct SubChunk {
    pub block_states: BlockPalette,
    pub biomes: BiomePalette,
}

#[derive(Clone)]
pub struct ChunkData {
    /// Ordered bottom to top, `SUBCHUNKS_COUNT` entries
    pub sections: Box<[SubChunk]>,
    /// First free y above the highest non-air block of each column, indexed z * 16 + x
    heightmap: Box<[i32; CHUNK_AREA]>,
    pub block_entities: HashMap<BlockPos, Arc<dyn BlockEntity>>,
    /// Ticks this chunk received
    pub inhabited_time: i64,
    /// Whether the chunk changed since it was last written to the store
    pub dirty: bool,
    pub position: Vector2<i32>,
}

/// Section index of an absolute y, `None` outside of the world
#[inline]
pub fn section_index(y: i32) -> Option<usize> {
    let relative = y - WORLD_LOWEST_Y as i32;
    (relative >= 0 && (relative as usize) < WORLD_HEIGHT).then_some(relative as usize / 16)
}

#[inline]
fn column_index(x: usize, z: usize) -> usize {
    z * CHUNK_WIDTH + x
}

fn local_xz(x: i32, z: i32) -> Option<(usize, usize)> {
    let range = 0..CHUNK_WIDTH as i32;
    (range.contains(&x) && range.contains(&z)).then_some((x as usize, z as usize))
}

impl ChunkData {
    /// A chunk made only of air in the plains biome
    pub fn new(position: Vector2<i32>) -> Self {
        Self {
            sections: vec![SubChunk::default(); SUBCHUNKS_COUNT].into_boxed_slice(),
            heightmap: Box::new([WORLD_LOWEST_Y as i32; CHUNK_AREA]),
            block_entities: HashMap::new(),
            inhabited_time: 0,
            dirty: false,
            position,
        }
    }

    /// Gets the block state at chunk relative x, z and absolute y
    pub fn get_block_state_id(&self, x: i32, y: i32, z: i32) -> Option<u16> {
        let (x, z) = local_xz(x, z)?;
        let section = section_index(y)?;
        let local_y = (y - WORLD_LOWEST_Y as i32) as usize % 16;
        Some(self.sections[section].block_states.get(x, local_y, z))
    }

    /// Sets the block state at chunk relative x, z and absolute y, returning the old state.
    /// Keeps the heightmap and the tile entities in line with the new block.
    pub fn set_block_state(&mut self, x: i32, y: i32, z: i32, state_id: u16) -> Option<u16> {
        let (local_x, local_z) = local_xz(x, z)?;
        let section = section_index(y)?;
        let local_y = (y - WORLD_LOWEST_Y as i32) as usize % 16;

        let old = self.sections[section]
            .block_states
            .set(local_x, local_y, local_z, state_id);
        if old == state_id {
            return Some(old);
        }
        self.dirty = true;
        self.update_heightmap(local_x, y, local_z, state_id);

        let position = BlockPos::from_chunk_relative(self.position, x, y, z);
        let old_block = BlockState::from_state_id(old).map(|state| state.block.id);
        let new_block = BlockState::from_state_id(state_id).map(|state| state.block.id);
        if old_block != new_block {
            if self.block_entities.remove(&position).is_some() {
                log::trace!("Removed tile entity at {position}");
            }
            if let Some(block_entity) = block_entity_for_state(state_id, position) {
                self.block_entities.insert(position, block_entity);
            }
        }
        Some(old)
    }

    fn update_heightmap(&mut self, x: usize, y: i32, z: usize, state_id: u16) {
        let index = column_index(x, z);
        let height = self.heightmap[index];
        let is_air = BlockState::from_state_id(state_id).is_none_or(|state| state.is_air());
        if !is_air {
            if y >= height {
                self.heightmap[index] = y + 1;
            }
        } else if y + 1 == height {
            self.heightmap[index] = self.scan_height(x, y, z);
        }
    }

    /// First free y above the highest non-air block at or below `from`
    fn scan_height(&self, x: usize, from: i32, z: usize) -> i32 {
        (WORLD_LOWEST_Y as i32..=from)
            .rev()
            .find(|y| {
                self.get_block_state_id(x as i32, *y, z as i32)
                    .is_some_and(|state| !crate::block::is_air_state(state))
            })
            .map_or(WORLD_LOWEST_Y as i32, |y| y + 1)
    }

    /// Rebuilds the heightmap of every column from the block data
    pub fn recalculate_heightmap(&mut self) {
        let top = WORLD_LOWEST_Y as i32 + WORLD_HEIGHT as i32 - 1;
        for z in 0..CHUNK_WIDTH {
            for x in 0..CHUNK_WIDTH {
                self.heightmap[column_index(x, z)] = self.scan_height(x, top, z);
            }
        }
    }

    /// First free y above the highest non-air block of a column, `WORLD_LOWEST_Y` if it
    /// only holds air
    pub fn highest_block_y(&self, x: i32, z: i32) -> Option<i32> {
        let (x, z) = local_xz(x, z)?;
        Some(self.heightmap[column_index(x, z)])
    }

    pub fn get_biome_id(&self, x: i32, y: i32, z: i32) -> Option<u8> {
        let (x, z) = local_xz(x, z)?;
        let section = section_index(y)?;
        let local_y = (y - WORLD_LOWEST_Y as i32) as usize % 16;
        Some(self.sections[section].biomes.get(x >> 2, local_y >> 2, z >> 2))
    }

    pub fn set_biome_id(&mut self, x: i32, y: i32, z: i32, biome_id: u8) -> Option<u8> {
        let (x, z) = local_xz(x, z)?;
        let section = section_index(y)?;
        let local_y = (y - WORLD_LOWEST_Y as i32) as usize % 16;
        let old = self.sections[section]
            .biomes
            .set(x >> 2, local_y >> 2, z >> 2, biome_id);
        self.dirty |= old != biome_id;
        Some(old)
    }

    /// Sets every biome cell of the chunk
    pub fn fill_biome(&mut self, biome_id: u8) {
        for section in self.sections.iter_mut() {
            section.biomes = BiomePalette::Homogeneous(biome_id);
        }
        self.dirty = true;
    }

    pub fn block_entity(&self, position: &BlockPos) -> Option<Arc<dyn BlockEntity>> {
        self.block_entities.get(position).cloned()
    }

    /// Gives `random_tick_speed` random positions of every non-empty section a random
    /// tick. Returns how many blocks changed.
    pub fn tick_random<R: Rng + ?Sized>(&mut self, rng: &mut R, random_tick_speed: u32) -> usize {
        let mut changed = 0;
        for section in 0..self.sections.len() {
            if self.sections[section].block_states.non_air_block_count() == 0 {
                continue;
            }
            let base_y = WORLD_LOWEST_Y as i32 + section as i32 * 16;
            for _ in 0..random_tick_speed {
                let x = rng.gen_range(0..16);
                let y = base_y + rng.gen_range(0..16);
                let z = rng.gen_range(0..16);

                let Some(state) = self
                    .get_block_state_id(x, y, z)
                    .and_then(BlockState::from_state_id)
                else {
                    continue;
                };
                if let Some(next) = state.random_tick() {
                    self.set_block_state(x, y, z, next.state_id);
                    changed += 1;
                }
            }
        }
        changed
    }
}

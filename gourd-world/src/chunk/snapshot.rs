use gourd_util::math::vector2::Vector2;
use thiserror::Error;

use super::{section_index, ChunkData, SubChunk, CHUNK_AREA, CHUNK_WIDTH, SUBCHUNKS_COUNT};
use crate::{
    biome::Biome,
    block::Block,
    chunk::palette::{BiomePalette, BlockPalette},
    WORLD_LOWEST_Y,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("{0} was not included when the snapshot was taken")]
    NotCaptured(&'static str),
    #[error("Position {x} {y} {z} is outside of the chunk")]
    OutOfBounds { x: i32, y: i32, z: i32 },
}

/// What a snapshot copies besides the block data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Per column highest block
    pub include_max_y: bool,
    pub include_biome: bool,
    /// Raw temperature and rainfall of the biomes
    pub include_biome_climate: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            include_max_y: true,
            include_biome: false,
            include_biome_climate: false,
        }
    }
}

/// A read-only copy of a chunk at one point in time. Owns all of its data, so it can be
/// moved to and shared between any threads.
#[derive(Debug, Clone)]
pub struct ChunkSnapshot {
    position: Vector2<i32>,
    world_name: String,
    capture_full_time: i64,
    block_states: Box<[BlockPalette]>,
    heightmap: Option<Box<[i32]>>,
    biomes: Option<Box<[BiomePalette]>>,
    options: SnapshotOptions,
}

impl ChunkSnapshot {
    pub fn capture(
        chunk: &ChunkData,
        world_name: &str,
        capture_full_time: i64,
        options: SnapshotOptions,
    ) -> Self {
        let heightmap = options.include_max_y.then(|| {
            let mut heightmap = Vec::with_capacity(CHUNK_AREA);
            for z in 0..CHUNK_WIDTH as i32 {
                for x in 0..CHUNK_WIDTH as i32 {
                    heightmap.push(
                        chunk
                            .highest_block_y(x, z)
                            .unwrap_or(WORLD_LOWEST_Y as i32),
                    );
                }
            }
            heightmap.into_boxed_slice()
        });
        let biomes = (options.include_biome || options.include_biome_climate).then(|| {
            chunk
                .sections
                .iter()
                .map(|section| section.biomes.clone())
                .collect()
        });

        log::trace!(
            "Captured snapshot of chunk {} in {world_name} ({options:?})",
            chunk.position
        );

        Self {
            position: chunk.position,
            world_name: world_name.to_string(),
            capture_full_time,
            block_states: chunk
                .sections
                .iter()
                .map(|SubChunk { block_states, .. }| block_states.clone())
                .collect(),
            heightmap,
            biomes,
            options,
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn z(&self) -> i32 {
        self.position.z
    }

    pub fn world_name(&self) -> &str {
        &self.world_name
    }

    /// World age when the snapshot was taken
    pub fn capture_full_time(&self) -> i64 {
        self.capture_full_time
    }

    pub fn options(&self) -> SnapshotOptions {
        self.options
    }

    fn locate(&self, x: i32, y: i32, z: i32) -> Result<(usize, usize, usize, usize), SnapshotError> {
        let range = 0..CHUNK_WIDTH as i32;
        match section_index(y) {
            Some(section) if range.contains(&x) && range.contains(&z) => Ok((
                section,
                x as usize,
                (y - WORLD_LOWEST_Y as i32) as usize % 16,
                z as usize,
            )),
            _ => Err(SnapshotError::OutOfBounds { x, y, z }),
        }
    }

    pub fn block_state_id(&self, x: i32, y: i32, z: i32) -> Result<u16, SnapshotError> {
        let (section, x, y, z) = self.locate(x, y, z)?;
        Ok(self.block_states[section].get(x, y, z))
    }

    pub fn block(&self, x: i32, y: i32, z: i32) -> Result<&'static Block, SnapshotError> {
        let state = self.block_state_id(x, y, z)?;
        Ok(Block::from_state_id(state).unwrap_or(&Block::AIR))
    }

    /// Namespaced name of the block at the given position
    pub fn block_name(&self, x: i32, y: i32, z: i32) -> Result<String, SnapshotError> {
        Ok(self.block(x, y, z)?.registry_id())
    }

    /// Whether the section with the given index holds only air. Indices outside the
    /// world count as empty.
    pub fn is_section_empty(&self, section: usize) -> bool {
        self.block_states
            .get(section)
            .is_none_or(|states| states.non_air_block_count() == 0)
    }

    pub fn section_count(&self) -> usize {
        SUBCHUNKS_COUNT
    }

    /// First free y above the highest non-air block of a column
    pub fn highest_block_y_at(&self, x: i32, z: i32) -> Result<i32, SnapshotError> {
        let heightmap = self
            .heightmap
            .as_ref()
            .ok_or(SnapshotError::NotCaptured("max y"))?;
        let (_, x, _, z) = self.locate(x, WORLD_LOWEST_Y as i32, z)?;
        Ok(heightmap[z * CHUNK_WIDTH + x])
    }

    fn biome_at(&self, x: i32, y: i32, z: i32) -> Result<&'static Biome, SnapshotError> {
        let biomes = self
            .biomes
            .as_ref()
            .ok_or(SnapshotError::NotCaptured("biome"))?;
        let (section, x, y, z) = self.locate(x, y, z)?;
        let id = biomes[section].get(x >> 2, y >> 2, z >> 2);
        Ok(Biome::from_id(id).unwrap_or(&Biome::PLAINS))
    }

    pub fn biome(&self, x: i32, y: i32, z: i32) -> Result<&'static Biome, SnapshotError> {
        if !self.options.include_biome {
            return Err(SnapshotError::NotCaptured("biome"));
        }
        self.biome_at(x, y, z)
    }

    pub fn raw_biome_temperature(&self, x: i32, y: i32, z: i32) -> Result<f64, SnapshotError> {
        if !self.options.include_biome_climate {
            return Err(SnapshotError::NotCaptured("biome climate"));
        }
        Ok(self.biome_at(x, y, z)?.temperature_at(y))
    }

    pub fn raw_biome_rainfall(&self, x: i32, y: i32, z: i32) -> Result<f64, SnapshotError> {
        if !self.options.include_biome_climate {
            return Err(SnapshotError::NotCaptured("biome climate"));
        }
        Ok(self.biome_at(x, y, z)?.downfall as f64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gourd_util::math::vector2::Vector2;

    use super::{ChunkSnapshot, SnapshotError, SnapshotOptions};
    use crate::{biome::Biome, block::Block, chunk::ChunkData, WORLD_LOWEST_Y};

    fn sample_chunk() -> ChunkData {
        let mut chunk = ChunkData::new(Vector2::new(3, 4));
        chunk.fill_biome(Biome::DESERT.id);
        chunk.set_block_state(1, 64, 2, Block::SAND.default_state_id());
        chunk
    }

    #[test]
    fn default_options_only_include_max_y() {
        let snapshot = ChunkSnapshot::capture(&sample_chunk(), "world", 10, SnapshotOptions::default());

        assert_eq!((snapshot.x(), snapshot.z()), (3, 4));
        assert_eq!(snapshot.world_name(), "world");
        assert_eq!(snapshot.capture_full_time(), 10);
        assert_eq!(snapshot.block_name(1, 64, 2).unwrap(), "minecraft:sand");
        assert_eq!(snapshot.highest_block_y_at(1, 2), Ok(65));
        assert_eq!(snapshot.highest_block_y_at(0, 0), Ok(WORLD_LOWEST_Y as i32));
        assert_eq!(
            snapshot.biome(1, 64, 2),
            Err(SnapshotError::NotCaptured("biome"))
        );
        assert!(snapshot.raw_biome_temperature(1, 64, 2).is_err());
    }

    #[test]
    fn optional_data() {
        let chunk = sample_chunk();
        let options = SnapshotOptions {
            include_max_y: false,
            include_biome: true,
            include_biome_climate: true,
        };
        let snapshot = ChunkSnapshot::capture(&chunk, "world", 0, options);

        assert_eq!(
            snapshot.highest_block_y_at(1, 2),
            Err(SnapshotError::NotCaptured("max y"))
        );
        assert_eq!(snapshot.biome(1, 64, 2), Ok(&Biome::DESERT));
        assert_eq!(snapshot.raw_biome_temperature(0, 0, 0), Ok(2.0));
        assert_eq!(snapshot.raw_biome_rainfall(0, 0, 0), Ok(0.0));

        let climate_only = ChunkSnapshot::capture(
            &chunk,
            "world",
            0,
            SnapshotOptions {
                include_biome: false,
                ..options
            },
        );
        assert!(climate_only.biome(0, 0, 0).is_err());
        assert_eq!(climate_only.raw_biome_temperature(0, 0, 0), Ok(2.0));
    }

    #[test]
    fn sections_and_bounds() {
        let snapshot = ChunkSnapshot::capture(&sample_chunk(), "world", 0, SnapshotOptions::default());
        // y = 64 lives in section 8
        assert!(!snapshot.is_section_empty(8));
        assert!(snapshot.is_section_empty(0));
        assert!(snapshot.is_section_empty(99));
        assert!(matches!(
            snapshot.block_state_id(16, 0, 0),
            Err(SnapshotError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn independent_of_later_changes() {
        let mut chunk = sample_chunk();
        let snapshot = ChunkSnapshot::capture(&chunk, "world", 0, SnapshotOptions::default());
        chunk.set_block_state(1, 64, 2, Block::GLASS.default_state_id());

        assert_eq!(snapshot.block(1, 64, 2), Ok(&Block::SAND));
    }

    #[test]
    fn readable_from_other_threads() {
        let snapshot = Arc::new(ChunkSnapshot::capture(
            &sample_chunk(),
            "world",
            0,
            SnapshotOptions::default(),
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let snapshot = snapshot.clone();
                std::thread::spawn(move || snapshot.block_name(1, 64, 2).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "minecraft:sand");
        }
    }
}

use gourd_config::chunk::{ChunkConfig, GeneratorKind};
use gourd_util::math::vector2::Vector2;

use crate::chunk::ChunkData;

mod flat;

pub use flat::{FlatGenerator, VoidGenerator};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed(pub u64);

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Self(value as u64)
    }
}

pub trait GeneratorInit {
    fn new(seed: Seed, config: &ChunkConfig) -> Self;
}

/// Creates the contents of chunks that were never stored. Called from the rayon pool.
pub trait WorldGenerator: Sync + Send {
    fn generate_chunk(&self, at: Vector2<i32>) -> ChunkData;
}

pub fn get_world_gen(seed: Seed, config: &ChunkConfig) -> Box<dyn WorldGenerator> {
    match config.generator {
        GeneratorKind::Flat => Box::new(FlatGenerator::new(seed, config)),
        GeneratorKind::Void => Box::new(VoidGenerator::new(seed, config)),
    }
}

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ChunkConfig {
    /// Which generator creates chunks that do not exist yet
    pub generator: GeneratorKind,
    /// Layers of the flat generator, from the bottom of the world upwards
    pub flat_layers: Vec<FlatLayer>,
    /// Random ticks every ticking chunk section receives per world tick
    pub random_tick_speed: u32,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::Flat,
            flat_layers: vec![
                FlatLayer::new("bedrock", 1),
                FlatLayer::new("dirt", 2),
                FlatLayer::new("grass_block", 1),
            ],
            random_tick_speed: 3,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    #[default]
    Flat,
    Void,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FlatLayer {
    pub block: String,
    pub height: u32,
}

impl FlatLayer {
    pub fn new(block: &str, height: u32) -> Self {
        Self {
            block: block.to_string(),
            height,
        }
    }
}

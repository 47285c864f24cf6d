/// A biome with its base climate values.
#[derive(Debug, PartialEq)]
pub struct Biome {
    pub id: u8,
    pub name: &'static str,
    pub temperature: f32,
    pub downfall: f32,
}

const fn biome(id: u8, name: &'static str, temperature: f32, downfall: f32) -> Biome {
    Biome {
        id,
        name,
        temperature,
        downfall,
    }
}

impl Biome {
    pub const PLAINS: Biome = biome(0, "plains", 0.8, 0.4);
    pub const DESERT: Biome = biome(1, "desert", 2.0, 0.0);
    pub const FOREST: Biome = biome(2, "forest", 0.7, 0.8);
    pub const TAIGA: Biome = biome(3, "taiga", 0.25, 0.8);
    pub const SWAMP: Biome = biome(4, "swamp", 0.8, 0.9);
    pub const SNOWY_PLAINS: Biome = biome(5, "snowy_plains", 0.0, 0.5);
    pub const OCEAN: Biome = biome(6, "ocean", 0.5, 0.5);
    pub const RIVER: Biome = biome(7, "river", 0.5, 0.5);

    pub fn from_id(id: u8) -> Option<&'static Biome> {
        BIOMES.get(id as usize)
    }

    pub fn from_name(name: &str) -> Option<&'static Biome> {
        let name = name.strip_prefix("minecraft:").unwrap_or(name);
        BIOMES.iter().find(|biome| biome.name == name)
    }

    /// Temperature at a height. Air cools down above sea level.
    pub fn temperature_at(&self, y: i32) -> f64 {
        let base = self.temperature as f64;
        if y > SNOW_LINE_START {
            base - (y - SNOW_LINE_START) as f64 * 0.05 / 40.0
        } else {
            base
        }
    }
}

const SNOW_LINE_START: i32 = 80;

static BIOMES: &[Biome] = &[
    Biome::PLAINS,
    Biome::DESERT,
    Biome::FOREST,
    Biome::TAIGA,
    Biome::SWAMP,
    Biome::SNOWY_PLAINS,
    Biome::OCEAN,
    Biome::RIVER,
];

pub mod entities;

/// A block type. Every block owns a contiguous range of state ids starting at
/// `first_state_id`.
#[derive(Debug, PartialEq, Eq)]
pub struct Block {
    pub id: u16,
    pub name: &'static str,
    pub first_state_id: u16,
    pub state_count: u16,
    pub is_air: bool,
    /// Identifier of the tile entity placed together with this block
    pub block_entity: Option<&'static str>,
    /// Highest `age` of blocks that grow on random ticks
    pub max_age: Option<u16>,
}

const fn block(id: u16, name: &'static str, first_state_id: u16) -> Block {
    Block {
        id,
        name,
        first_state_id,
        state_count: 1,
        is_air: false,
        block_entity: None,
        max_age: None,
    }
}

impl Block {
    pub const AIR: Block = Block {
        is_air: true,
        ..block(0, "air", 0)
    };
    pub const STONE: Block = block(1, "stone", 1);
    pub const GRASS_BLOCK: Block = block(2, "grass_block", 2);
    pub const DIRT: Block = block(3, "dirt", 3);
    pub const BEDROCK: Block = block(4, "bedrock", 4);
    pub const WATER: Block = block(5, "water", 5);
    pub const SAND: Block = block(6, "sand", 6);
    pub const OAK_LOG: Block = block(7, "oak_log", 7);
    pub const OAK_LEAVES: Block = block(8, "oak_leaves", 8);
    pub const FARMLAND: Block = block(9, "farmland", 9);
    pub const WHEAT: Block = Block {
        state_count: 8,
        max_age: Some(7),
        ..block(10, "wheat", 10)
    };
    pub const CHEST: Block = Block {
        block_entity: Some("minecraft:chest"),
        ..block(11, "chest", 18)
    };
    pub const OAK_SIGN: Block = Block {
        block_entity: Some("minecraft:sign"),
        ..block(12, "oak_sign", 19)
    };
    pub const BARREL: Block = Block {
        block_entity: Some("minecraft:barrel"),
        ..block(13, "barrel", 20)
    };
    pub const GLASS: Block = block(14, "glass", 21);
    pub const TORCH: Block = block(15, "torch", 22);

    pub fn from_state_id(state_id: u16) -> Option<&'static Block> {
        BLOCKS.iter().find(|block| block.has_state(state_id))
    }

    /// Looks a block up by name, with or without the `minecraft:` namespace.
    pub fn from_name(name: &str) -> Option<&'static Block> {
        let name = name.strip_prefix("minecraft:").unwrap_or(name);
        BLOCKS.iter().find(|block| block.name == name)
    }

    pub const fn default_state_id(&self) -> u16 {
        self.first_state_id
    }

    pub const fn has_state(&self, state_id: u16) -> bool {
        state_id >= self.first_state_id && state_id < self.first_state_id + self.state_count
    }

    pub fn registry_id(&self) -> String {
        format!("minecraft:{}", self.name)
    }
}

static BLOCKS: &[Block] = &[
    Block::AIR,
    Block::STONE,
    Block::GRASS_BLOCK,
    Block::DIRT,
    Block::BEDROCK,
    Block::WATER,
    Block::SAND,
    Block::OAK_LOG,
    Block::OAK_LEAVES,
    Block::FARMLAND,
    Block::WHEAT,
    Block::CHEST,
    Block::OAK_SIGN,
    Block::BARREL,
    Block::GLASS,
    Block::TORCH,
];

/// A concrete state of a block as stored in a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockState {
    pub state_id: u16,
    pub block: &'static Block,
}

impl BlockState {
    pub const AIR: BlockState = BlockState {
        state_id: 0,
        block: &Block::AIR,
    };

    pub fn from_state_id(state_id: u16) -> Option<Self> {
        Block::from_state_id(state_id).map(|block| Self { state_id, block })
    }

    pub fn is_air(&self) -> bool {
        self.block.is_air
    }

    /// Growth stage of ageing blocks, `None` for all others.
    pub fn age(&self) -> Option<u16> {
        self.block
            .max_age
            .map(|_| self.state_id - self.block.first_state_id)
    }

    /// The state of the same block with another age. Clamped to the block's maximum.
    pub fn with_age(&self, age: u16) -> Self {
        match self.block.max_age {
            Some(max_age) => Self {
                state_id: self.block.first_state_id + age.min(max_age),
                block: self.block,
            },
            None => *self,
        }
    }

    /// The state this one turns into when it receives a random tick, if it changes.
    pub fn random_tick(&self) -> Option<Self> {
        let age = self.age()?;
        let max_age = self.block.max_age?;
        (age < max_age).then(|| self.with_age(age + 1))
    }
}

pub fn is_air_state(state_id: u16) -> bool {
    Block::from_state_id(state_id).is_none_or(|block| block.is_air)
}

#[cfg(test)]
mod tests {
    use super::{is_air_state, Block, BlockState, BLOCKS};

    #[test]
    fn state_ranges_are_contiguous() {
        let mut next_state = 0;
        for (id, block) in BLOCKS.iter().enumerate() {
            assert_eq!(block.id as usize, id);
            assert_eq!(block.first_state_id, next_state, "{}", block.name);
            next_state += block.state_count;
        }
    }

    #[test]
    fn lookup_by_name_and_state() {
        assert_eq!(Block::from_name("minecraft:chest"), Some(&Block::CHEST));
        assert_eq!(Block::from_name("dirt"), Some(&Block::DIRT));
        assert_eq!(Block::from_name("unknown"), None);

        assert_eq!(Block::from_state_id(13), Some(&Block::WHEAT));
        assert_eq!(Block::from_state_id(Block::CHEST.first_state_id), Some(&Block::CHEST));
        assert_eq!(Block::from_state_id(1000), None);
        assert!(is_air_state(0));
        assert!(!is_air_state(Block::STONE.default_state_id()));
    }

    #[test]
    fn wheat_grows_until_ripe() {
        let mut state = BlockState::from_state_id(Block::WHEAT.default_state_id()).unwrap();
        assert_eq!(state.age(), Some(0));

        let mut ticks = 0;
        while let Some(next) = state.random_tick() {
            state = next;
            ticks += 1;
        }
        assert_eq!(ticks, 7);
        assert_eq!(state.age(), Some(7));
        assert!(BlockState::AIR.random_tick().is_none());
    }
}

use std::{any::Any, sync::Arc};

use gourd_util::math::position::BlockPos;

use super::Block;

/// Extra state attached to a block position, stored by the chunk that contains it.
pub trait BlockEntity: Send + Sync {
    fn identifier(&self) -> &'static str;
    fn get_position(&self) -> BlockPos;
    fn as_any(&self) -> &dyn Any;
}

pub struct ChestBlockEntity {
    pub position: BlockPos,
}

impl ChestBlockEntity {
    pub const ID: &'static str = "minecraft:chest";

    pub fn new(position: BlockPos) -> Self {
        Self { position }
    }
}

impl BlockEntity for ChestBlockEntity {
    fn identifier(&self) -> &'static str {
        Self::ID
    }

    fn get_position(&self) -> BlockPos {
        self.position
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct SignBlockEntity {
    pub position: BlockPos,
    pub lines: [String; 4],
}

impl SignBlockEntity {
    pub const ID: &'static str = "minecraft:sign";

    pub fn new(position: BlockPos) -> Self {
        Self {
            position,
            lines: Default::default(),
        }
    }
}

impl BlockEntity for SignBlockEntity {
    fn identifier(&self) -> &'static str {
        Self::ID
    }

    fn get_position(&self) -> BlockPos {
        self.position
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct BarrelBlockEntity {
    pub position: BlockPos,
}

impl BarrelBlockEntity {
    pub const ID: &'static str = "minecraft:barrel";

    pub fn new(position: BlockPos) -> Self {
        Self { position }
    }
}

impl BlockEntity for BarrelBlockEntity {
    fn identifier(&self) -> &'static str {
        Self::ID
    }

    fn get_position(&self) -> BlockPos {
        self.position
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Creates the tile entity that belongs to a freshly placed block state, if it has one.
pub fn block_entity_for_state(state_id: u16, position: BlockPos) -> Option<Arc<dyn BlockEntity>> {
    let id = Block::from_state_id(state_id)?.block_entity?;
    match id {
        ChestBlockEntity::ID => Some(Arc::new(ChestBlockEntity::new(position))),
        SignBlockEntity::ID => Some(Arc::new(SignBlockEntity::new(position))),
        BarrelBlockEntity::ID => Some(Arc::new(BarrelBlockEntity::new(position))),
        _ => {
            log::warn!("No tile entity implementation for {id}");
            None
        }
    }
}

use std::sync::atomic::{AtomicI32, Ordering};

use crossbeam::atomic::AtomicCell;
use gourd_util::math::{position::BlockPos, vector2::Vector2, vector3::Vector3};
use gourd_world::watch_area::WatchArea;

pub type EntityId = i32;

static CURRENT_ID: AtomicI32 = AtomicI32::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityType {
    Player,
    Zombie,
    Slime,
    Cow,
    Item,
    ArmorStand,
}

impl EntityType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Player => "minecraft:player",
            Self::Zombie => "minecraft:zombie",
            Self::Slime => "minecraft:slime",
            Self::Cow => "minecraft:cow",
            Self::Item => "minecraft:item",
            Self::ArmorStand => "minecraft:armor_stand",
        }
    }

    /// Observers keep the chunks around them watched
    pub fn is_observer(&self) -> bool {
        matches!(self, Self::Player)
    }
}

/// Anything that lives in a world and has a position, players and mobs alike
pub struct Entity {
    /// A unique identifier for the entity
    pub entity_id: EntityId,
    /// A persistent, unique identifier for the entity
    pub entity_uuid: uuid::Uuid,
    pub entity_type: EntityType,
    /// The entity's current position in the world
    pub pos: AtomicCell<Vector3<f64>>,
    /// The entity's position rounded to the nearest block coordinates
    pub block_pos: AtomicCell<BlockPos>,
    /// The chunk coordinates of the entity's current position
    pub chunk_pos: AtomicCell<Vector2<i32>>,
    /// Chunks this entity watches, observers only
    pub watch_area: AtomicCell<Option<WatchArea>>,
}

impl Entity {
    pub fn new(entity_type: EntityType, position: Vector3<f64>) -> Self {
        let block_pos = BlockPos(position.floor_i32());
        Self {
            entity_id: CURRENT_ID.fetch_add(1, Ordering::Relaxed),
            entity_uuid: uuid::Uuid::new_v4(),
            entity_type,
            pos: AtomicCell::new(position),
            block_pos: AtomicCell::new(block_pos),
            chunk_pos: AtomicCell::new(block_pos.chunk_position()),
            watch_area: AtomicCell::new(None),
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.pos.load()
    }

    /// Updates the position and the derived block and chunk positions
    pub fn set_pos(&self, new_position: Vector3<f64>) {
        self.pos.store(new_position);
        let block_pos = BlockPos(new_position.floor_i32());
        self.block_pos.store(block_pos);
        self.chunk_pos.store(block_pos.chunk_position());
    }
}

#[cfg(test)]
mod tests {
    use gourd_util::math::{position::BlockPos, vector2::Vector2, vector3::Vector3};

    use super::{Entity, EntityType};

    #[test]
    fn positions_follow_moves() {
        let entity = Entity::new(EntityType::Cow, Vector3::new(-0.5, 64.0, 31.9));
        assert_eq!(entity.block_pos.load(), BlockPos::new(-1, 64, 31));
        assert_eq!(entity.chunk_pos.load(), Vector2::new(-1, 1));

        entity.set_pos(Vector3::new(16.0, 70.2, -16.1));
        assert_eq!(entity.block_pos.load(), BlockPos::new(16, 70, -17));
        assert_eq!(entity.chunk_pos.load(), Vector2::new(1, -2));
    }

    #[test]
    fn unique_ids() {
        let a = Entity::new(EntityType::Item, Vector3::new(0.0, 0.0, 0.0));
        let b = Entity::new(EntityType::Item, Vector3::new(0.0, 0.0, 0.0));
        assert_ne!(a.entity_id, b.entity_id);
        assert_ne!(a.entity_uuid, b.entity_uuid);
        assert!(EntityType::Player.is_observer());
        assert!(!EntityType::Zombie.is_observer());
    }
}

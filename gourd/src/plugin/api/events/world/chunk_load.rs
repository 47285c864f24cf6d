use std::sync::Arc;

use gourd_macros::Event;
use gourd_world::level::SyncChunk;

use crate::world::{chunk::WorldChunk, World};

/// An event that occurs when a chunk is brought into memory, either read from the store or
/// freshly generated.
#[derive(Event, Clone)]
pub struct ChunkLoad {
    /// The world in which the chunk is being loaded.
    pub world: Arc<World>,

    /// Handle of the chunk being loaded.
    pub chunk: WorldChunk,

    /// The chunk data, wrapped in a read-write lock for safe concurrent access.
    pub data: SyncChunk,

    /// Whether the chunk was generated just now.
    pub is_new: bool,
}

impl ChunkLoad {
    pub fn new(world: Arc<World>, chunk: WorldChunk, data: SyncChunk, is_new: bool) -> Self {
        Self {
            world,
            chunk,
            data,
            is_new,
        }
    }
}

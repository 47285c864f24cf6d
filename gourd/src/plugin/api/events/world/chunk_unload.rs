use std::sync::Arc;

use gourd_macros::{cancellable, Event};
use gourd_world::level::SyncChunk;

use crate::world::{chunk::WorldChunk, World};

/// An event that occurs right before a chunk leaves memory.
///
/// Cancelling it keeps the chunk loaded.
#[cancellable]
#[derive(Event, Clone)]
pub struct ChunkUnload {
    /// The world in which the chunk is being unloaded.
    pub world: Arc<World>,

    /// Handle of the chunk being unloaded.
    pub chunk: WorldChunk,

    /// The chunk data, wrapped in a read-write lock for safe concurrent access.
    pub data: SyncChunk,

    /// Whether the chunk is written to the store. Handlers may change it.
    pub save: bool,
}

impl ChunkUnload {
    pub fn new(world: Arc<World>, chunk: WorldChunk, data: SyncChunk, save: bool) -> Self {
        Self {
            world,
            chunk,
            data,
            save,
            cancelled: false,
        }
    }
}

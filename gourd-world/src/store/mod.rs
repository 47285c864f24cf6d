use std::error;

use async_trait::async_trait;
use gourd_util::math::vector2::Vector2;

use crate::chunk::{ChunkData, ChunkReadingError, ChunkWritingError};

#[cfg(any(test, feature = "test_helper"))]
mod flaky;
mod memory;

#[cfg(any(test, feature = "test_helper"))]
pub use flaky::FlakyChunkStore;
pub use memory::MemoryChunkStore;

/// The result of loading a chunk data.
///
/// It can be the data loaded successfully, the data not found or an error
/// with the chunk coordinates and the error that occurred.
pub enum LoadedData<D, Err: error::Error>
where
    D: Send,
{
    /// The chunk data was loaded successfully
    Loaded(D),

    /// The chunk data was not found
    Missing(Vector2<i32>),

    /// An error occurred while loading the chunk data
    Error((Vector2<i32>, Err)),
}

/// Where chunks go when they leave memory and where they come back from.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn read_chunk(&self, at: Vector2<i32>) -> LoadedData<ChunkData, ChunkReadingError>;

    /// Persist the chunks data
    async fn save_chunks(
        &self,
        chunks_data: Vec<(Vector2<i32>, ChunkData)>,
    ) -> Result<(), ChunkWritingError>;

    async fn has_chunk(&self, at: Vector2<i32>) -> bool;

    /// Get all stored chunk positions
    async fn list_chunks(&self) -> Vec<Vector2<i32>>;
}

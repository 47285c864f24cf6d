//! In-memory chunk store. Data is lost when the process exits.

use async_trait::async_trait;
use dashmap::DashMap;
use gourd_util::math::vector2::Vector2;

use super::{ChunkStore, LoadedData};
use crate::chunk::{ChunkData, ChunkReadingError, ChunkWritingError};

#[derive(Default)]
pub struct MemoryChunkStore {
    chunks: DashMap<Vector2<i32>, ChunkData>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn read_chunk(&self, at: Vector2<i32>) -> LoadedData<ChunkData, ChunkReadingError> {
        match self.chunks.get(&at) {
            Some(chunk) => LoadedData::Loaded(chunk.value().clone()),
            None => LoadedData::Missing(at),
        }
    }

    async fn save_chunks(
        &self,
        chunks_data: Vec<(Vector2<i32>, ChunkData)>,
    ) -> Result<(), ChunkWritingError> {
        log::trace!("Storing {} chunks in memory", chunks_data.len());
        for (at, mut chunk) in chunks_data {
            chunk.dirty = false;
            self.chunks.insert(at, chunk);
        }
        Ok(())
    }

    async fn has_chunk(&self, at: Vector2<i32>) -> bool {
        self.chunks.contains_key(&at)
    }

    async fn list_chunks(&self) -> Vec<Vector2<i32>> {
        self.chunks.iter().map(|entry| *entry.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use gourd_util::math::vector2::Vector2;

    use super::MemoryChunkStore;
    use crate::{
        block::Block,
        chunk::ChunkData,
        store::{ChunkStore, LoadedData},
    };

    #[tokio::test]
    async fn stores_and_reads_back() {
        let store = MemoryChunkStore::new();
        let pos = Vector2::new(10, -5);

        assert!(!store.has_chunk(pos).await);
        assert!(matches!(store.read_chunk(pos).await, LoadedData::Missing(at) if at == pos));

        let mut chunk = ChunkData::new(pos);
        chunk.set_block_state(0, 0, 0, Block::STONE.default_state_id());
        assert!(chunk.dirty);
        store.save_chunks(vec![(pos, chunk)]).await.unwrap();

        assert!(store.has_chunk(pos).await);
        assert_eq!(store.list_chunks().await, vec![pos]);
        let LoadedData::Loaded(read) = store.read_chunk(pos).await else {
            panic!("chunk should be stored");
        };
        assert!(!read.dirty);
        assert_eq!(read.get_block_state_id(0, 0, 0), Some(Block::STONE.default_state_id()));
    }
}

//! A memory store whose reads and writes can be made to fail.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use gourd_util::math::vector2::Vector2;

use super::{ChunkStore, LoadedData, MemoryChunkStore};
use crate::chunk::{ChunkData, ChunkReadingError, ChunkWritingError};

#[derive(Default)]
pub struct FlakyChunkStore {
    inner: MemoryChunkStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChunkStore for FlakyChunkStore {
    async fn read_chunk(&self, at: Vector2<i32>) -> LoadedData<ChunkData, ChunkReadingError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return LoadedData::Error((at, ChunkReadingError::Store("read refused".to_string())));
        }
        self.inner.read_chunk(at).await
    }

    async fn save_chunks(
        &self,
        chunks_data: Vec<(Vector2<i32>, ChunkData)>,
    ) -> Result<(), ChunkWritingError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ChunkWritingError::Store("write refused".to_string()));
        }
        self.inner.save_chunks(chunks_data).await
    }

    async fn has_chunk(&self, at: Vector2<i32>) -> bool {
        self.inner.has_chunk(at).await
    }

    async fn list_chunks(&self) -> Vec<Vector2<i32>> {
        self.inner.list_chunks().await
    }
}

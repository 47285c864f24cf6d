use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use dashmap::{DashMap, DashSet, Entry};
use gourd_config::advanced_config;
use gourd_util::math::vector2::Vector2;
use num_traits::Zero;
use tokio::sync::{oneshot, RwLock};

use crate::{
    chunk::{ChunkData, ChunkReadingError, ChunkWritingError},
    generation::{get_world_gen, Seed, WorldGenerator},
    store::{ChunkStore, LoadedData},
};

pub type SyncChunk = Arc<RwLock<ChunkData>>;

/// A chunk handed out by `Level::load_chunk`
pub struct LoadedChunk {
    pub chunk: SyncChunk,
    /// Whether this call brought the chunk into memory. Of several concurrent loads of one
    /// position exactly one inserts it.
    pub inserted: bool,
    /// Whether this call generated the chunk
    pub is_new: bool,
}

/// The `Level` keeps the chunks of one world in memory.
///
/// Key features include:
///
/// - **Chunk Loading:** Loads chunks from the `ChunkStore`.
/// - **Chunk Caching:** Stores accessed chunks in memory for faster access.
/// - **Chunk Generation:** Generates new chunks on-demand using a specified `WorldGenerator`.
/// - **Ticking:** Decides which loaded chunks receive ticks: the watched and the sticky ones.
pub struct Level {
    pub seed: Seed,
    loaded_chunks: Arc<DashMap<Vector2<i32>, SyncChunk>>,
    chunk_watchers: Arc<DashMap<Vector2<i32>, usize>>,
    sticky_chunks: DashSet<Vector2<i32>>,
    chunk_store: Arc<dyn ChunkStore>,
    world_gen: Arc<dyn WorldGenerator>,
    world_age: AtomicI64,
}

impl Level {
    /// A level using the generator from the advanced configuration
    pub fn new(seed: Seed, chunk_store: Arc<dyn ChunkStore>) -> Self {
        let world_gen = get_world_gen(seed, &advanced_config().chunk).into();
        Self::with_generator(seed, chunk_store, world_gen)
    }

    pub fn with_generator(
        seed: Seed,
        chunk_store: Arc<dyn ChunkStore>,
        world_gen: Arc<dyn WorldGenerator>,
    ) -> Self {
        Self {
            seed,
            loaded_chunks: Arc::new(DashMap::new()),
            chunk_watchers: Arc::new(DashMap::new()),
            sticky_chunks: DashSet::new(),
            chunk_store,
            world_gen,
            world_age: AtomicI64::new(0),
        }
    }

    pub fn chunk_store(&self) -> &Arc<dyn ChunkStore> {
        &self.chunk_store
    }

    /// Ticks this level went through
    pub fn world_age(&self) -> i64 {
        self.world_age.load(Ordering::Relaxed)
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.loaded_chunks.len()
    }

    pub fn loaded_chunk_positions(&self) -> Vec<Vector2<i32>> {
        self.loaded_chunks.iter().map(|entry| *entry.key()).collect()
    }

    pub fn is_chunk_loaded(&self, chunk: &Vector2<i32>) -> bool {
        self.loaded_chunks.contains_key(chunk)
    }

    pub fn try_get_chunk(&self, chunk: &Vector2<i32>) -> Option<SyncChunk> {
        self.loaded_chunks.get(chunk).map(|entry| entry.value().clone())
    }

    /// Brings a chunk into memory, reading it from the store or, if `generate` is set and the
    /// store does not know it, generating it.
    ///
    /// Returns `None` when the chunk does not exist and may not be generated.
    pub async fn load_chunk(
        &self,
        at: Vector2<i32>,
        generate: bool,
    ) -> Result<Option<LoadedChunk>, ChunkReadingError> {
        if let Some(chunk) = self.try_get_chunk(&at) {
            return Ok(Some(LoadedChunk {
                chunk,
                inserted: false,
                is_new: false,
            }));
        }

        match self.chunk_store.read_chunk(at).await {
            LoadedData::Loaded(chunk) => {
                log::trace!("Read chunk {at} from the store");
                let (chunk, inserted) = self.cache(at, chunk);
                Ok(Some(LoadedChunk {
                    chunk,
                    inserted,
                    is_new: false,
                }))
            }
            LoadedData::Missing(_) if generate => {
                let chunk = self.generate_chunk(at).await?;
                log::trace!("Generated chunk {at}");
                let (chunk, inserted) = self.cache(at, chunk);
                Ok(Some(LoadedChunk {
                    chunk,
                    inserted,
                    is_new: inserted,
                }))
            }
            LoadedData::Missing(_) => Ok(None),
            LoadedData::Error((pos, error)) => {
                log::error!("Failed to load chunk at {pos}: {error}");
                Err(error)
            }
        }
    }

    #[inline]
    pub async fn get_or_generate_chunk(
        &self,
        at: Vector2<i32>,
    ) -> Result<SyncChunk, ChunkReadingError> {
        self.load_chunk(at, true)
            .await?
            .map(|loaded| loaded.chunk)
            .ok_or(ChunkReadingError::ChunkNotExist)
    }

    /// Puts a chunk into the cache unless another task was faster. Returns the cached chunk
    /// and whether it is the given one.
    fn cache(&self, at: Vector2<i32>, chunk: ChunkData) -> (SyncChunk, bool) {
        match self.loaded_chunks.entry(at) {
            Entry::Occupied(occupied) => (occupied.get().clone(), false),
            Entry::Vacant(vacant) => {
                let chunk = Arc::new(RwLock::new(chunk));
                vacant.insert(chunk.clone());
                (chunk, true)
            }
        }
    }

    async fn generate_chunk(&self, at: Vector2<i32>) -> Result<ChunkData, ChunkReadingError> {
        let (send, recv) = oneshot::channel();
        let world_gen = self.world_gen.clone();
        rayon::spawn(move || {
            let _ = send.send(world_gen.generate_chunk(at));
        });
        recv.await.map_err(|_| ChunkReadingError::GenerationFailed)
    }

    /// Drops a chunk from memory, writing it to the store first if `save` is set and it
    /// changed since it was read. Returns whether the chunk was loaded.
    ///
    /// The chunk stays cached until it is written, so a failed write keeps it loaded and
    /// dirty.
    pub async fn remove_chunk(
        &self,
        at: Vector2<i32>,
        save: bool,
    ) -> Result<bool, ChunkWritingError> {
        let Some(chunk) = self.try_get_chunk(&at) else {
            return Ok(false);
        };

        let mut data = chunk.write().await;
        if save && data.dirty {
            log::trace!("Writing chunk {at} to the store");
            self.chunk_store
                .save_chunks(vec![(at, data.clone())])
                .await?;
            data.dirty = false;
        }
        // Still holding the lock, nobody changed the chunk since it was written
        self.loaded_chunks
            .remove_if(&at, |_, cached| Arc::ptr_eq(cached, &chunk));
        Ok(true)
    }

    /// Writes every changed chunk that is currently in memory to the store
    pub async fn save(&self) -> Result<(), ChunkWritingError> {
        log::info!("Saving level...");

        let mut chunks_to_write = Vec::new();
        let mut written = Vec::new();
        for (at, chunk) in self.loaded_chunks() {
            let mut data = chunk.write().await;
            if data.dirty {
                chunks_to_write.push((at, data.clone()));
                data.dirty = false;
                drop(data);
                written.push(chunk);
            }
        }

        if chunks_to_write.is_empty() {
            return Ok(());
        }
        log::trace!("Writing {} chunks to the store", chunks_to_write.len());
        if let Err(error) = self.chunk_store.save_chunks(chunks_to_write).await {
            for chunk in written {
                chunk.write().await.dirty = true;
            }
            return Err(error);
        }
        Ok(())
    }

    fn loaded_chunks(&self) -> Vec<(Vector2<i32>, SyncChunk)> {
        self.loaded_chunks
            .iter()
            .map(|chunk| (*chunk.key(), chunk.value().clone()))
            .collect()
    }

    /// Marks chunks as "watched" by a unique observer. Should only be called on chunks the
    /// observer was not watching before
    pub fn mark_chunks_as_newly_watched(&self, chunks: &[Vector2<i32>]) {
        for chunk in chunks {
            log::trace!("{chunk} marked as newly watched");
            match self.chunk_watchers.entry(*chunk) {
                Entry::Occupied(mut occupied) => {
                    let value = occupied.get_mut();
                    if let Some(new_value) = value.checked_add(1) {
                        *value = new_value;
                    } else {
                        log::error!("Watching overflow on chunk {chunk}");
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(1);
                }
            }
        }
    }

    /// Marks chunks no longer "watched" by a unique observer. Should only be called on chunks
    /// the observer was watching before. Returns the chunks nobody watches anymore.
    pub fn mark_chunks_as_not_watched(&self, chunks: &[Vector2<i32>]) -> Vec<Vector2<i32>> {
        let mut chunks_to_clean = Vec::new();

        for chunk in chunks {
            log::trace!("{chunk} marked as no longer watched");
            match self.chunk_watchers.entry(*chunk) {
                Entry::Occupied(mut occupied) => {
                    let value = occupied.get_mut();
                    *value = value.saturating_sub(1);

                    if *value == 0 {
                        occupied.remove_entry();
                        chunks_to_clean.push(*chunk);
                    }
                }
                Entry::Vacant(_) => {
                    log::debug!("{chunk} was not watched");
                }
            }
        }

        chunks_to_clean
    }

    pub fn is_chunk_watched(&self, chunk: &Vector2<i32>) -> bool {
        self.chunk_watchers
            .get(chunk)
            .is_some_and(|count| !count.is_zero())
    }

    /// Loaded chunks without any observer
    pub fn unwatched_chunks(&self) -> Vec<Vector2<i32>> {
        self.loaded_chunks
            .iter()
            .map(|entry| *entry.key())
            .filter(|pos| {
                self.chunk_watchers
                    .get(pos)
                    .is_none_or(|count| count.is_zero())
            })
            .collect()
    }

    /// Sticky chunks keep receiving ticks while loaded, even when nobody watches them.
    /// The flag is kept per position and may be set on chunks that are not loaded.
    pub fn set_sticky(&self, chunk: Vector2<i32>, sticky: bool) {
        if sticky {
            self.sticky_chunks.insert(chunk);
        } else {
            self.sticky_chunks.remove(&chunk);
        }
    }

    pub fn is_sticky(&self, chunk: &Vector2<i32>) -> bool {
        self.sticky_chunks.contains(chunk)
    }

    pub fn should_tick(&self, chunk: &Vector2<i32>) -> bool {
        self.is_chunk_loaded(chunk) && (self.is_chunk_watched(chunk) || self.is_sticky(chunk))
    }

    pub fn ticking_chunks(&self) -> Vec<(Vector2<i32>, SyncChunk)> {
        self.loaded_chunks()
            .into_iter()
            .filter(|(pos, _)| self.should_tick(pos))
            .collect()
    }

    /// Advances the level by one tick. Every ticking chunk gains inhabited time and receives
    /// random ticks. Returns the number of chunks that were ticked.
    pub async fn tick_chunks(&self) -> usize {
        self.world_age.fetch_add(1, Ordering::Relaxed);
        let random_tick_speed = advanced_config().chunk.random_tick_speed;

        let ticking = self.ticking_chunks();
        for (_, chunk) in &ticking {
            let mut chunk = chunk.write().await;
            chunk.inhabited_time += 1;
            chunk.tick_random(&mut rand::thread_rng(), random_tick_speed);
        }
        ticking.len()
    }
}

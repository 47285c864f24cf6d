pub mod chunk_load;
pub mod chunk_unload;

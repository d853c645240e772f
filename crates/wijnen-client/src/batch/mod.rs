//! Batched variation lookups.
//!
//! A lookup of many variations is processed in three steps:
//!
//! 1. **Chunking**: the variation list is split into chunks of at most
//!    `chunk_size` identifiers
//! 2. **Dispatch**: one request per chunk runs on a worker pool of
//!    `max_concurrency` tasks; all chunks are awaited
//! 3. **Merge**: the per-chunk mappings are concatenated key by key in chunk
//!    order, or the first failed chunk is reported
//!
//! The order of the merged value lists only depends on chunk order, never on
//! which request happened to finish first.

mod chunker;
mod dispatcher;
mod merge;
mod types;

pub use chunker::{chunk, Chunks};
pub use dispatcher::BatchDispatcher;
pub use merge::merge;
pub use types::{ChunkOutcome, DispatcherConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CONCURRENCY};

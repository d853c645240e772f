//! Data types for batched variation lookups.

use std::num::NonZeroUsize;

use crate::error::ClientResult;
use crate::transport::VariationMap;

/// Number of variations sent per request.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Number of requests allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Configuration for the batch dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Maximum variations per chunk.
    pub chunk_size: NonZeroUsize,
    /// Maximum chunk requests running concurrently.
    pub max_concurrency: NonZeroUsize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            chunk_size: NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
            max_concurrency: NonZeroUsize::new(DEFAULT_MAX_CONCURRENCY)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl DispatcherConfig {
    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the worker pool size.
    pub fn with_max_concurrency(mut self, max_concurrency: NonZeroUsize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// Result of the request for one chunk.
#[derive(Debug)]
pub struct ChunkOutcome {
    /// Position of the chunk in submission order.
    pub index: usize,
    /// Number of variations the chunk carried.
    pub len: usize,
    /// The service response, or why there is none.
    pub result: ClientResult<VariationMap>,
}

impl ChunkOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

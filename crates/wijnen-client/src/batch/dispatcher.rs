//! Concurrent dispatch of chunked variation lookups.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::chunker::chunk;
use super::types::{ChunkOutcome, DispatcherConfig};
use crate::credential::ApiKeyHash;
use crate::error::{ClientError, ClientResult};
use crate::transport::{NetworkCaller, Variation, VariationMap, VariationRequest};

/// Splits variation lookups into chunks and runs one request per chunk on a
/// bounded worker pool.
///
/// The pool is created once per dispatcher and shared by every call to
/// [`dispatch`](Self::dispatch), so the concurrency limit holds across
/// overlapping lookups made through the same client.
pub struct BatchDispatcher<C>
where
    C: NetworkCaller,
{
    /// Performs the per-chunk requests.
    caller: Arc<C>,
    config: DispatcherConfig,
    /// One permit per worker. Tokio's semaphore is fair, so queued chunks
    /// start in submission order.
    workers: Arc<Semaphore>,
}

impl<C> BatchDispatcher<C>
where
    C: NetworkCaller + 'static,
{
    /// Creates a dispatcher around `caller`.
    pub fn new(caller: Arc<C>, config: DispatcherConfig) -> Self {
        Self {
            caller,
            workers: Arc::new(Semaphore::new(config.max_concurrency.get())),
            config,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Looks up `variations` chunk by chunk.
    ///
    /// Waits for every chunk to finish, successfully or not; a failing chunk
    /// does not cancel its siblings. Outcomes are returned in chunk order,
    /// independent of the order in which the requests completed.
    pub async fn dispatch(
        &self,
        variations: Vec<Variation>,
        parameters: &[String],
        api_key: Option<&ApiKeyHash>,
    ) -> Vec<ChunkOutcome> {
        let variation_count = variations.len();
        let chunks = chunk(variations, self.config.chunk_size);
        let chunk_count = chunks.len();

        if chunk_count == 0 {
            return Vec::new();
        }

        debug!(
            variations = variation_count,
            chunks = chunk_count,
            max_concurrency = self.config.max_concurrency.get(),
            "dispatching variation lookup"
        );

        let mut sizes = Vec::with_capacity(chunk_count);
        let mut handles = Vec::with_capacity(chunk_count);

        for (index, variations) in chunks.enumerate() {
            sizes.push(variations.len());
            let request = VariationRequest {
                api_key: api_key.cloned(),
                variations,
                additional_parameters: parameters.to_vec(),
            };
            handles.push(self.submit(index, request).await);
        }

        let results = join_all(handles).await;

        let outcomes: Vec<ChunkOutcome> = results
            .into_iter()
            .zip(sizes)
            .enumerate()
            .map(|(index, (joined, len))| {
                let result = joined.unwrap_or_else(|e| {
                    Err(ClientError::TaskFailed {
                        index,
                        message: e.to_string(),
                    })
                });
                if let Err(e) = &result {
                    warn!(chunk = index, variations = len, error = %e, "chunk request failed");
                }
                ChunkOutcome { index, len, result }
            })
            .collect();

        debug!(
            chunks = chunk_count,
            failed = outcomes.iter().filter(|o| !o.is_success()).count(),
            "variation lookup finished"
        );

        outcomes
    }

    /// Waits for a free worker, then spawns the request for one chunk on it.
    async fn submit(
        &self,
        index: usize,
        request: VariationRequest,
    ) -> JoinHandle<ClientResult<VariationMap>> {
        match Arc::clone(&self.workers).acquire_owned().await {
            Ok(permit) => {
                let caller = Arc::clone(&self.caller);
                tokio::spawn(async move {
                    let _permit = permit;
                    caller.process_variations(&request).await
                })
            }
            // The pool is never closed while the dispatcher is alive.
            Err(e) => {
                let message = e.to_string();
                tokio::spawn(async move { Err(ClientError::TaskFailed { index, message }) })
            }
        }
    }
}

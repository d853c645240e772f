//! Error types for client operations.

use thiserror::Error;

/// Errors returned by the wijnen client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The service answered with a non-success HTTP status.
    #[error("unexpected status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// At least one chunk of a batched lookup failed.
    ///
    /// `index` is the first failed chunk in submission order.
    #[error("chunk {index} failed ({failed} of {total} chunks failed): {source}")]
    ChunkFailed {
        index: usize,
        failed: usize,
        total: usize,
        #[source]
        source: Box<ClientError>,
    },

    /// The task running a chunk panicked or was aborted.
    #[error("task for chunk {index} did not complete: {message}")]
    TaskFailed { index: usize, message: String },

    /// The client was constructed with unusable settings.
    #[error("invalid client configuration: {message}")]
    InvalidConfig { message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

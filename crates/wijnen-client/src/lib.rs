//! wijnen-client: client for the wijnen web-api
//!
//! The client looks up variations against a wijnen service. Large lookups
//! are split into chunks, sent concurrently on a bounded worker pool and
//! merged back into a single mapping.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               wijnen-client                  │
//! ├─────────────────────────────────────────────┤
//! │  client.rs     - WijnenClient facade        │
//! │  credential.rs - API key hashing, identity  │
//! │  batch/        - Chunk, dispatch, merge     │
//! │  transport/    - NetworkCaller + HTTP impl  │
//! │  config.rs     - Configuration management   │
//! │  logging.rs    - tracing subscriber setup   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wijnen_client::WijnenClient;
//!
//! let client = WijnenClient::new("localhost", 5000, Some("my-api-key"))?;
//! let attributes = client.get_attributes().await?;
//! let found = client
//!     .get_variations(vec!["chr7:140453136:A>T".to_string()], &["gene".to_string()])
//!     .await?;
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod logging;
pub mod transport;

// Re-exports for convenience
pub use client::WijnenClient;
pub use config::{ClientConfig, ConfigLoadError};
pub use credential::{hash_api_key, ApiKeyHash, ConnectionIdentity};
pub use error::{ClientError, ClientResult};
pub use transport::{AttributeSummary, HttpCaller, NetworkCaller, Variation, VariationMap};

//! Network boundary of the client.
//!
//! The batching pipeline only talks to the service through [`NetworkCaller`],
//! so tests (and alternative transports) can be swapped in without touching
//! the dispatcher or merger.

mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::credential::ApiKeyHash;
use crate::error::ClientResult;

pub use self::http::{HttpCaller, ATTRIBUTE_SUMMARY_PATH, PROCESS_VARIATIONS_PATH};

/// An identifier submitted for lookup.
pub type Variation = String;

/// Result-key to values, as returned by one variation call or by a merge.
pub type VariationMap = BTreeMap<String, Vec<serde_json::Value>>;

/// Attribute name to description, as returned by the attribute summary.
pub type AttributeSummary = BTreeMap<String, serde_json::Value>;

/// Body of an attribute summary request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRequest {
    pub api_key: Option<ApiKeyHash>,
}

/// Body of a single variation lookup (one chunk).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationRequest {
    pub api_key: Option<ApiKeyHash>,
    pub variations: Vec<Variation>,
    pub additional_parameters: Vec<String>,
}

/// Performs one request against the wijnen service.
///
/// Implementations must not retry on their own; a failure is reported to the
/// caller as-is.
#[async_trait]
pub trait NetworkCaller: Send + Sync {
    /// Fetches the attribute summary of the service database.
    async fn attribute_summary(&self, request: &AttributeRequest) -> ClientResult<AttributeSummary>;

    /// Looks up one chunk of variations.
    async fn process_variations(&self, request: &VariationRequest) -> ClientResult<VariationMap>;
}

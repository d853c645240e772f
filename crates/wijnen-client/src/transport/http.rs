//! reqwest-backed [`NetworkCaller`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{AttributeRequest, AttributeSummary, NetworkCaller, VariationMap, VariationRequest};
use crate::credential::ConnectionIdentity;
use crate::error::{ClientError, ClientResult};

/// Endpoint returning the attribute summary.
pub const ATTRIBUTE_SUMMARY_PATH: &str = "attribute_summary";

/// Endpoint processing a chunk of variations.
pub const PROCESS_VARIATIONS_PATH: &str = "process_variations";

/// Sends JSON POST requests to a wijnen web-api.
///
/// Holds a single `reqwest::Client`, whose connection pool is shared by all
/// concurrent chunk calls.
#[derive(Debug, Clone)]
pub struct HttpCaller {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCaller {
    /// Creates a caller for the service described by `identity`.
    pub fn new(identity: &ConnectionIdentity, timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: identity.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> ClientResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "sending request");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl NetworkCaller for HttpCaller {
    async fn attribute_summary(&self, request: &AttributeRequest) -> ClientResult<AttributeSummary> {
        self.post(ATTRIBUTE_SUMMARY_PATH, request).await
    }

    async fn process_variations(&self, request: &VariationRequest) -> ClientResult<VariationMap> {
        self.post(PROCESS_VARIATIONS_PATH, request).await
    }
}

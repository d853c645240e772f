//! The wijnen client facade.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::batch::{merge, BatchDispatcher, DispatcherConfig};
use crate::config::ClientConfig;
use crate::credential::ConnectionIdentity;
use crate::error::{ClientError, ClientResult};
use crate::transport::{
    AttributeRequest, AttributeSummary, HttpCaller, NetworkCaller, Variation, VariationMap,
};

/// Request timeout used by [`WijnenClient::new`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection to a wijnen web-api.
///
/// Holds the connection identity (host, port and hashed API key) and a worker
/// pool for batched variation lookups. The client is cheap to share behind an
/// `Arc`; concurrent lookups share the same pool.
pub struct WijnenClient<C = HttpCaller>
where
    C: NetworkCaller,
{
    identity: ConnectionIdentity,
    caller: Arc<C>,
    dispatcher: BatchDispatcher<C>,
}

impl WijnenClient<HttpCaller> {
    /// Creates an HTTP client for `host:port`, hashing `api_key` if given.
    pub fn new(host: impl Into<String>, port: u16, api_key: Option<&str>) -> ClientResult<Self> {
        let identity = ConnectionIdentity::new(host, port, api_key);
        let caller = HttpCaller::new(&identity, DEFAULT_REQUEST_TIMEOUT)?;
        Ok(Self::with_caller(identity, caller, DispatcherConfig::default()))
    }

    /// Creates an HTTP client from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        config.validate().map_err(|e| ClientError::InvalidConfig {
            message: e.to_string(),
        })?;
        let dispatcher_config =
            DispatcherConfig::try_from(&config.batch).map_err(|e| ClientError::InvalidConfig {
                message: e.to_string(),
            })?;

        let connection = &config.connection;
        let identity = ConnectionIdentity::new(
            connection.host.clone(),
            connection.port,
            connection.api_key.as_deref(),
        );
        let caller = HttpCaller::new(&identity, connection.request_timeout())?;

        Ok(Self::with_caller(identity, caller, dispatcher_config))
    }
}

impl<C> WijnenClient<C>
where
    C: NetworkCaller + 'static,
{
    /// Creates a client that sends its requests through `caller`.
    pub fn with_caller(identity: ConnectionIdentity, caller: C, config: DispatcherConfig) -> Self {
        let caller = Arc::new(caller);
        Self {
            dispatcher: BatchDispatcher::new(Arc::clone(&caller), config),
            identity,
            caller,
        }
    }

    pub fn identity(&self) -> &ConnectionIdentity {
        &self.identity
    }

    pub fn dispatcher_config(&self) -> &DispatcherConfig {
        self.dispatcher.config()
    }

    /// Returns the database attributes known to the service, mapped to their
    /// descriptions.
    #[instrument(skip(self), fields(host = %self.identity.host(), port = self.identity.port()))]
    pub async fn get_attributes(&self) -> ClientResult<AttributeSummary> {
        let request = AttributeRequest {
            api_key: self.identity.api_key_hash().cloned(),
        };
        self.caller.attribute_summary(&request).await
    }

    /// Looks up `variations`, returning the merged response of every chunk.
    ///
    /// `parameters` names additional attributes the service should return.
    /// Either every chunk succeeds and the full mapping is returned, or the
    /// call fails with [`ClientError::ChunkFailed`]; a partial mapping is
    /// never returned.
    #[instrument(
        skip(self, variations, parameters),
        fields(variations = variations.len(), parameters = parameters.len())
    )]
    pub async fn get_variations(
        &self,
        variations: Vec<Variation>,
        parameters: &[String],
    ) -> ClientResult<VariationMap> {
        let outcomes = self
            .dispatcher
            .dispatch(variations, parameters, self.identity.api_key_hash())
            .await;
        merge(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::hash_api_key;
    use crate::transport::VariationRequest;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCaller {
        attribute_requests: Mutex<Vec<AttributeRequest>>,
        variation_requests: Mutex<Vec<VariationRequest>>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl NetworkCaller for RecordingCaller {
        async fn attribute_summary(
            &self,
            request: &AttributeRequest,
        ) -> ClientResult<AttributeSummary> {
            self.attribute_requests.lock().unwrap().push(request.clone());
            let mut summary = AttributeSummary::new();
            summary.insert("gene".to_string(), json!("Gene symbol"));
            Ok(summary)
        }

        async fn process_variations(
            &self,
            request: &VariationRequest,
        ) -> ClientResult<VariationMap> {
            self.variation_requests.lock().unwrap().push(request.clone());
            if let Some(bad) = self.fail_on {
                if request.variations.iter().any(|v| v == bad) {
                    return Err(ClientError::Status {
                        endpoint: "process_variations".to_string(),
                        status: 503,
                    });
                }
            }
            let mut map = VariationMap::new();
            map.insert(
                "not_found".to_string(),
                request.variations.iter().map(|v| json!(v)).collect(),
            );
            Ok(map)
        }
    }

    fn client(caller: RecordingCaller) -> WijnenClient<RecordingCaller> {
        let identity = ConnectionIdentity::new("localhost", 5000, Some("secret"));
        WijnenClient::with_caller(identity, caller, DispatcherConfig::default())
    }

    fn variations(count: usize) -> Vec<Variation> {
        (0..count).map(|i| format!("chr1:{i}:A>T")).collect()
    }

    #[tokio::test]
    async fn test_get_attributes_sends_hashed_key() {
        let client = client(RecordingCaller::default());

        let summary = client.get_attributes().await.unwrap();

        assert_eq!(summary["gene"], json!("Gene symbol"));
        let requests = client.caller.attribute_requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].api_key, hash_api_key(Some("secret")));
    }

    #[tokio::test]
    async fn test_get_variations_with_no_input_makes_no_calls() {
        let client = client(RecordingCaller::default());

        let merged = client
            .get_variations(Vec::new(), &["gene".to_string()])
            .await
            .unwrap();

        assert!(merged.is_empty());
        assert!(client.caller.variation_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_variations_merges_all_chunks() {
        let client = client(RecordingCaller::default());
        let input = variations(250);

        let merged = client.get_variations(input.clone(), &[]).await.unwrap();

        let expected: Vec<_> = input.iter().map(|v| json!(v)).collect();
        assert_eq!(merged["not_found"], expected);

        let requests = client.caller.variation_requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests
            .iter()
            .all(|r| r.api_key == hash_api_key(Some("secret"))));
    }

    #[tokio::test]
    async fn test_get_variations_reports_failing_chunk() {
        let caller = RecordingCaller {
            fail_on: Some("chr1:120:A>T"),
            ..Default::default()
        };
        let client = client(caller);

        let result = client.get_variations(variations(300), &[]).await;

        match result {
            Err(ClientError::ChunkFailed { index, total, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(total, 3);
            }
            other => panic!("Expected ChunkFailed, got {other:?}"),
        }
        // Siblings still ran
        assert_eq!(client.caller.variation_requests.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_new_builds_http_client() {
        let client = WijnenClient::new("127.0.0.1", 8080, None).unwrap();

        assert_eq!(client.identity().base_url(), "http://127.0.0.1:8080");
        assert!(client.identity().api_key_hash().is_none());
        assert_eq!(client.dispatcher_config(), &DispatcherConfig::default());
    }

    #[test]
    fn test_from_config_applies_batch_settings() {
        let mut config = ClientConfig::default();
        config.connection.api_key = Some("secret".to_string());
        config.batch.chunk_size = 20;
        config.batch.max_concurrency = 2;

        let client = WijnenClient::from_config(&config).unwrap();

        assert_eq!(client.dispatcher_config().chunk_size.get(), 20);
        assert_eq!(client.dispatcher_config().max_concurrency.get(), 2);
        assert_eq!(
            client.identity().api_key_hash(),
            hash_api_key(Some("secret")).as_ref()
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_settings() {
        let mut config = ClientConfig::default();
        config.batch.chunk_size = 0;

        let result = WijnenClient::from_config(&config);

        assert!(matches!(result, Err(ClientError::InvalidConfig { .. })));
    }
}

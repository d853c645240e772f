//! API key hashing and the immutable connection identity.
//!
//! The plaintext API key never leaves the process: it is digested once with
//! SHA-224 when the client is built, and only the hex digest is attached to
//! outgoing payloads.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha224};

/// Hex-encoded SHA-224 digest of an API key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ApiKeyHash(String);

impl ApiKeyHash {
    /// Returns the digest as lowercase hex.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only a prefix, enough to tell keys apart in logs.
        write!(f, "ApiKeyHash({}…)", &self.0[..8])
    }
}

/// Hashes an optional API key.
///
/// `None` stays `None`; otherwise the UTF-8 bytes of the key are digested with
/// SHA-224 and hex encoded (56 characters).
pub fn hash_api_key(api_key: Option<&str>) -> Option<ApiKeyHash> {
    api_key.map(|key| {
        let mut hasher = Sha224::new();
        hasher.update(key.as_bytes());
        ApiKeyHash(hex::encode(hasher.finalize()))
    })
}

/// Host, port and hashed credential of a wijnen service.
///
/// Built once per client and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIdentity {
    host: String,
    port: u16,
    api_key_hash: Option<ApiKeyHash>,
}

impl ConnectionIdentity {
    /// Creates an identity, hashing `api_key` if one is given.
    pub fn new(host: impl Into<String>, port: u16, api_key: Option<&str>) -> Self {
        Self {
            host: host.into(),
            port,
            api_key_hash: hash_api_key(api_key),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn api_key_hash(&self) -> Option<&ApiKeyHash> {
        self.api_key_hash.as_ref()
    }

    /// Base URL of the service, e.g. `http://localhost:5000`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

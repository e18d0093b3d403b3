use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::SessionError;

const NO_STORE_ENDPOINT_MESSAGE: &str = "You must provide a valid checkpoint store endpoint parameter";
const NO_CREDENTIALS_MESSAGE: &str = "You must provide a valid credentials parameter";
const NO_CONNECTION_PROFILE_MESSAGE: &str = "You must provide a valid connection profile parameter";

const DEFAULT_IDENTITY_NAME: &str = "admin";
const DEFAULT_MSP_ID: &str = "org1msp";

/// Location of the checkpoint store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEndpoint {
    /// Connection URL
    pub url: String,
    /// Base64-encoded PEM CA certificate used to verify the store's TLS certificate
    #[serde(default)]
    pub ca_certificate: Option<String>,
}

impl StoreEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ca_certificate: None,
        }
    }

    pub fn with_ca_certificate(mut self, ca_certificate: impl Into<String>) -> Self {
        self.ca_certificate = Some(ca_certificate.into());
        self
    }
}

/// Ledger identity. Key and certificate are base64-encoded PEM.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub name: String,
    pub private_key: String,
    pub cert: String,
}

impl Credentials {
    pub fn new(name: impl Into<String>, private_key: impl Into<String>, cert: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private_key: private_key.into(),
            cert: cert.into(),
        }
    }

    /// Identity label, falling back to `admin` when no name was given
    pub fn identity_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_IDENTITY_NAME
        } else {
            &self.name
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.identity_name())
            .field("private_key", &"<redacted>")
            .field("cert", &format!("<{} bytes>", self.cert.len()))
            .finish()
    }
}

/// Channel and network topology descriptor.
///
/// `peers` keeps declaration order, the first peer is the one the block feed
/// subscribes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    /// Channel name, also used as the checkpoint stream name
    pub name: String,
    #[serde(default = "default_msp_id", rename = "mspId")]
    pub msp_id: String,
    #[serde(default)]
    pub peers: Map<String, Value>,
}

fn default_msp_id() -> String {
    DEFAULT_MSP_ID.to_string()
}

impl ConnectionProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            msp_id: default_msp_id(),
            peers: Map::new(),
        }
    }

    pub fn with_peer(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.peers
            .insert(name.into(), serde_json::json!({ "url": url.into() }));
        self
    }

    /// Parse a profile from its JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Name of the first declared peer
    pub fn first_peer(&self) -> Option<&str> {
        self.peers.keys().next().map(String::as_str)
    }

    /// Endpoint URL of a peer, if the profile declares one
    pub fn peer_url(&self, peer: &str) -> Option<&str> {
        self.peers.get(peer)?.get("url")?.as_str()
    }
}

/// Inputs for one processing run
#[derive(Debug, Clone, Default)]
pub struct ProcessingRequest {
    pub store_endpoint: Option<StoreEndpoint>,
    pub credentials: Option<Credentials>,
    pub connection_profile: Option<ConnectionProfile>,
    /// Manual override of the first block, takes precedence over the checkpoint
    pub start_block: Option<u64>,
    /// Manual override of the last block, takes precedence over the chain height
    pub end_block: Option<u64>,
}

impl ProcessingRequest {
    pub fn new(
        store_endpoint: StoreEndpoint,
        credentials: Credentials,
        connection_profile: ConnectionProfile,
    ) -> Self {
        Self {
            store_endpoint: Some(store_endpoint),
            credentials: Some(credentials),
            connection_profile: Some(connection_profile),
            start_block: None,
            end_block: None,
        }
    }

    pub fn with_start_block(mut self, start_block: u64) -> Self {
        self.start_block = Some(start_block);
        self
    }

    pub fn with_end_block(mut self, end_block: u64) -> Self {
        self.end_block = Some(end_block);
        self
    }

    /// Check that every required field is present
    pub fn validate(self) -> Result<ValidatedRequest, SessionError> {
        let store_endpoint = self
            .store_endpoint
            .filter(|endpoint| !endpoint.url.trim().is_empty())
            .ok_or_else(|| SessionError::Validation(NO_STORE_ENDPOINT_MESSAGE.to_string()))?;

        let credentials = self
            .credentials
            .ok_or_else(|| SessionError::Validation(NO_CREDENTIALS_MESSAGE.to_string()))?;

        let connection_profile = self
            .connection_profile
            .filter(|profile| !profile.name.trim().is_empty())
            .ok_or_else(|| SessionError::Validation(NO_CONNECTION_PROFILE_MESSAGE.to_string()))?;

        let peer = connection_profile
            .first_peer()
            .ok_or_else(|| {
                SessionError::Validation(format!(
                    "Connection profile '{}' does not declare any peers",
                    connection_profile.name
                ))
            })?
            .to_string();

        Ok(ValidatedRequest {
            store_endpoint,
            credentials,
            connection_profile,
            peer,
            start_block: self.start_block,
            end_block: self.end_block,
        })
    }
}

/// A request whose required fields are known to be present
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub store_endpoint: StoreEndpoint,
    pub credentials: Credentials,
    pub connection_profile: ConnectionProfile,
    /// Peer the block feed subscribes through
    pub peer: String,
    pub start_block: Option<u64>,
    pub end_block: Option<u64>,
}

impl ValidatedRequest {
    /// Checkpoint key and channel name
    pub fn stream_name(&self) -> &str {
        &self.connection_profile.name
    }
}

//! JSON-RPC ledger gateway implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::{BlockSource, ChannelHandle, ConnectionHandle, Identity, LedgerConnector, LedgerError};
use crate::domain::models::{ConnectionProfile, Credentials};
use crate::utils::logging;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC 2.0 client bound to one gateway endpoint
#[derive(Debug)]
pub(crate) struct RpcClient {
    endpoint: String,
    client: Client,
}

impl RpcClient {
    fn new(endpoint: String, client: Client) -> Self {
        Self { endpoint, client }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LedgerError::NetworkError(e.to_string()))?;

        let response_text = response
            .text()
            .await
            .map_err(|e| LedgerError::NetworkError(e.to_string()))?;

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| LedgerError::ParseError(e.to_string()))?;

        if let Some(error) = response_json.get("error").filter(|error| !error.is_null()) {
            return Err(LedgerError::RpcError(format!("{}: {}", method, error)));
        }

        response_json
            .get("result")
            .cloned()
            .ok_or_else(|| LedgerError::ParseError(format!("No result in {} response", method)))
    }
}

/// Connector for a ledger gateway that speaks JSON-RPC over HTTPS.
///
/// Each `connect` creates an authenticated client for its own peer and
/// identity. Channel queries and block lookups find it again through the
/// handle's session id, so one connector can serve concurrent sessions.
#[derive(Debug)]
pub struct GatewayConnector {
    request_timeout: Duration,
    clients: RwLock<HashMap<String, Arc<RpcClient>>>,
}

impl Default for GatewayConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayConnector {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            clients: RwLock::new(HashMap::new()),
        }
    }

    async fn register(&self, session_id: String, rpc: RpcClient) {
        self.clients.write().await.insert(session_id, Arc::new(rpc));
    }

    async fn rpc(&self, session_id: &str) -> Result<Arc<RpcClient>, LedgerError> {
        self.clients
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or(LedgerError::NotConnected)
    }
}

#[async_trait]
impl LedgerConnector for GatewayConnector {
    async fn connect(
        &self,
        credentials: &Credentials,
        profile: &ConnectionProfile,
    ) -> Result<ConnectionHandle, LedgerError> {
        let peer = profile.first_peer().ok_or_else(|| {
            LedgerError::ConfigError(format!("Connection profile '{}' has no peers", profile.name))
        })?;
        let peer_url = profile.peer_url(peer).ok_or_else(|| {
            LedgerError::ConfigError(format!("Peer '{}' has no url in the connection profile", peer))
        })?;
        let endpoint = normalize_peer_url(peer_url);

        let identity = Identity::from_credentials(credentials, &profile.msp_id)?;
        logging::log_gateway_connection_details(&profile.name, peer, &endpoint, &identity.name);

        let http = Client::builder()
            .identity(identity.to_tls_identity()?)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| LedgerError::ConnectionError(format!("Failed to build gateway client: {}", e)))?;
        let rpc = RpcClient::new(endpoint, http);

        let result = rpc
            .call(
                "gateway_connect",
                json!({
                    "identity": identity.name,
                    "mspId": identity.msp_id,
                    "certificate": identity.certificate_pem,
                }),
            )
            .await
            .map_err(|e| LedgerError::ConnectionError(format!("Could not connect to ledger: {}", e)))?;

        let session_id = result
            .get("session")
            .and_then(Value::as_str)
            .ok_or_else(|| LedgerError::ParseError("gateway_connect returned no session".to_string()))?
            .to_string();

        self.register(session_id.clone(), rpc).await;

        Ok(ConnectionHandle {
            session_id,
            identity: identity.name,
        })
    }

    async fn get_channel(
        &self,
        connection: &ConnectionHandle,
        channel_name: &str,
    ) -> Result<ChannelHandle, LedgerError> {
        self.rpc(&connection.session_id)
            .await?
            .call(
                "channel_open",
                json!({ "session": connection.session_id, "channel": channel_name }),
            )
            .await?;

        Ok(ChannelHandle {
            session_id: connection.session_id.clone(),
            name: channel_name.to_string(),
        })
    }

    async fn query_height(&self, channel: &ChannelHandle) -> Result<u64, LedgerError> {
        let info = self
            .rpc(&channel.session_id)
            .await?
            .call(
                "channel_query_info",
                json!({ "session": channel.session_id, "channel": channel.name }),
            )
            .await?;

        parse_height(&info)
    }

    async fn disconnect(&self, connection: &ConnectionHandle) {
        self.clients.write().await.remove(&connection.session_id);
    }
}

#[async_trait]
impl BlockSource for GatewayConnector {
    async fn block_exists(
        &self,
        channel: &ChannelHandle,
        peer: &str,
        number: u64,
    ) -> Result<bool, LedgerError> {
        let block = self
            .rpc(&channel.session_id)
            .await?
            .call(
                "channel_get_block",
                json!({
                    "session": channel.session_id,
                    "channel": channel.name,
                    "peer": peer,
                    "number": number,
                }),
            )
            .await?;

        Ok(!block.is_null())
    }
}

/// Map gRPC-style peer URLs onto the gateway's HTTP transport
fn normalize_peer_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("grpcs://") {
        format!("https://{}", rest)
    } else if let Some(rest) = url.strip_prefix("grpc://") {
        format!("http://{}", rest)
    } else {
        url.to_string()
    }
}

/// Chain height from a channel info payload.
///
/// Accepts a plain number or a `{ "low": .., "high": .. }` 64-bit pair.
fn parse_height(info: &Value) -> Result<u64, LedgerError> {
    let height = info
        .get("height")
        .ok_or_else(|| LedgerError::ParseError("Channel info has no height".to_string()))?;

    if let Some(height) = height.as_u64() {
        return Ok(height);
    }

    let low = height.get("low").and_then(Value::as_i64);
    let high = height.get("high").and_then(Value::as_i64).unwrap_or(0);
    match low {
        Some(low) => Ok(((high as u32 as u64) << 32) | (low as u32 as u64)),
        None => Err(LedgerError::ParseError(format!("Invalid chain height: {}", height))),
    }
}

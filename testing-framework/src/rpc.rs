// File: testing-framework/src/rpc.rs
//
// CometBFT RPC access
//
// Only the `/status` endpoint is needed by the harness: it drives the node
// health gate and every block-height wait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Sync status reported by a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStatus {
    pub latest_block_height: u64,
    pub catching_up: bool,
}

/// RPC client of a single node
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn status(&self) -> Result<NodeStatus>;

    /// Latest committed block height
    async fn height(&self) -> Result<u64> {
        Ok(self.status().await?.latest_block_height)
    }
}

/// Builds RPC clients from a published `host:port`
pub trait RpcConnector: Send + Sync {
    fn connect(&self, host_addr: &str) -> Result<Arc<dyn NodeRpc>>;
}

#[derive(Debug, Deserialize)]
struct SyncInfo {
    latest_block_height: String,
    catching_up: bool,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    sync_info: SyncInfo,
}

// Newer CometBFT wraps the result in a JSON-RPC envelope, older Tendermint
// REST handlers do not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusBody {
    JsonRpc { result: StatusResult },
    Bare(StatusResult),
}

/// Parses the body of `GET /status`
pub fn parse_status(body: &[u8]) -> Result<NodeStatus> {
    let body: StatusBody = serde_json::from_slice(body).context("decoding /status response")?;
    let sync = match body {
        StatusBody::JsonRpc { result } => result.sync_info,
        StatusBody::Bare(result) => result.sync_info,
    };
    Ok(NodeStatus {
        latest_block_height: sync
            .latest_block_height
            .parse()
            .with_context(|| format!("invalid block height {:?}", sync.latest_block_height))?,
        catching_up: sync.catching_up,
    })
}

/// HTTP client of one node's CometBFT RPC
pub struct CometRpcClient {
    http: reqwest::Client,
    base_url: String,
}

impl CometRpcClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NodeRpc for CometRpcClient {
    async fn status(&self) -> Result<NodeStatus> {
        let url = format!("{}/status", self.base_url);
        let body = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?
            .bytes()
            .await?;
        parse_status(&body)
    }
}

/// Connector producing [`CometRpcClient`]s
#[derive(Debug, Clone, Default)]
pub struct HttpRpcConnector;

/// `http://` URL for a published address, mapping the wildcard bind to loopback
pub fn rpc_url(host_addr: &str) -> String {
    let addr = host_addr
        .strip_prefix("tcp://")
        .unwrap_or(host_addr)
        .replacen("0.0.0.0:", "127.0.0.1:", 1);
    format!("http://{}", addr)
}

impl RpcConnector for HttpRpcConnector {
    fn connect(&self, host_addr: &str) -> Result<Arc<dyn NodeRpc>> {
        Ok(Arc::new(CometRpcClient::new(rpc_url(host_addr))?))
    }
}

// File: testing-framework/src/relayer.rs
//
// Relayer contract
//
// The harness never builds relayer commands itself. A relayer is an external
// collaborator that is told which paths exist, started once every chain is
// running and stopped at teardown.

use crate::orchestrator::TestEnv;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// IBC channel as reported by the relayer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelOutput {
    pub state: String,
    pub ordering: String,
    pub version: String,
    pub port_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub connection_hops: Vec<String>,
    #[serde(default)]
    pub counterparty_port_id: String,
    #[serde(default)]
    pub counterparty_channel_id: String,
}

/// IBC connection as reported by the relayer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionOutput {
    pub id: String,
    pub client_id: String,
    pub state: String,
    #[serde(default)]
    pub counterparty_connection_id: String,
}

/// A path between two chains, named by the test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayerPath {
    pub name: String,
    pub src_chain_id: String,
    pub dst_chain_id: String,
}

/// Relayer process driven by the interchain setup
#[async_trait]
pub trait Relayer: Send + Sync {
    /// Registers a path between two configured chains
    async fn setup_path(&self, path: &RelayerPath) -> Result<()>;

    /// Creates clients, connection and channel for `path`
    async fn link_path(&self, path: &str) -> Result<()>;

    /// Starts relaying on the given paths
    async fn start(&self, paths: &[String]) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    async fn get_channels(&self, chain_id: &str) -> Result<Vec<ChannelOutput>>;

    async fn get_connections(&self, chain_id: &str) -> Result<Vec<ConnectionOutput>>;
}

/// Builds relayers bound to a test environment
pub trait RelayerFactory: Send + Sync {
    fn build(&self, test_name: &str, env: &TestEnv) -> Result<Arc<dyn Relayer>>;

    /// Descriptive name, e.g. `rly@v2.3.1`
    fn name(&self) -> String;
}

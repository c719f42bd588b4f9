// File: testing-framework/src/node/da.rs
//
// Celestia data availability processes
//
// The bridge and light nodes run as detached jobs from a hub node's image.
// Their stores live under the shared celestia volume so keys can be copied in
// from the host.

use super::Node;
use anyhow::{Context, Result};
use rollup_e2e_common::config::{CELESTIA_HOME_ROOT, RPC_PORT_NUMBER};
use rollup_e2e_common::response::{BlockResponse, RpcBlockResponse};
use rollup_e2e_common::ConfigError;

/// Store of the bridge node, inside containers
pub fn bridge_store() -> String {
    format!("{}/bridge", CELESTIA_HOME_ROOT)
}

/// Store of the light node, inside containers
pub fn light_store() -> String {
    format!("{}/light", CELESTIA_HOME_ROOT)
}

/// Flags of `celestia bridge start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeStart {
    pub node_store: String,
    /// Consensus node the bridge follows
    pub core_ip: String,
    pub account_name: String,
    pub gateway_addr: String,
    pub rpc_addr: String,
}

impl BridgeStart {
    pub fn command(&self) -> Vec<String> {
        vec![
            "celestia".to_string(),
            "bridge".to_string(),
            "start".to_string(),
            "--node.store".to_string(),
            self.node_store.clone(),
            "--gateway".to_string(),
            "--core.ip".to_string(),
            self.core_ip.clone(),
            "--keyring.accname".to_string(),
            self.account_name.clone(),
            "--gateway.addr".to_string(),
            self.gateway_addr.clone(),
            "--rpc.addr".to_string(),
            self.rpc_addr.clone(),
        ]
    }
}

/// Flags of `celestia light start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightNodeStart {
    pub node_store: String,
    pub core_ip: String,
    pub p2p_network: String,
    pub account_name: String,
}

impl LightNodeStart {
    pub fn command(&self) -> Vec<String> {
        vec![
            "celestia".to_string(),
            "light".to_string(),
            "start".to_string(),
            "--node.store".to_string(),
            self.node_store.clone(),
            "--gateway".to_string(),
            "--core.ip".to_string(),
            self.core_ip.clone(),
            "--p2p.network".to_string(),
            self.p2p_network.clone(),
            "--keyring.accname".to_string(),
            self.account_name.clone(),
        ]
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

impl Node {
    /// Hash of the block at `height`, as reported by the consensus binary
    pub async fn block_hash(&self, height: u64) -> Result<String> {
        let height = height.to_string();
        let rpc = self.rpc_address();
        let command = strings(&[&self.config.bin, "query", "block", &height, "--node", &rpc]);
        let output = self
            .exec(command, Vec::new())
            .await
            .with_context(|| format!("node {}: query block {}", self.name, height))?;
        let block: BlockResponse = serde_json::from_slice(&output.stdout)
            .map_err(|e| ConfigError::json("block response", e))?;
        Ok(block.block_id.hash)
    }

    /// Latest height of the DA network this node belongs to
    pub async fn da_block_height(&self) -> Result<u64> {
        let url = format!("http://{}:{}/block", self.hostname, RPC_PORT_NUMBER);
        let output = self
            .exec(strings(&["curl", &url]), Vec::new())
            .await
            .with_context(|| format!("node {}: fetching {}", self.name, url))?;
        let block: RpcBlockResponse = serde_json::from_slice(&output.stdout)
            .map_err(|e| ConfigError::json("rpc block response", e))?;
        let height = &block.result.block.header.height;
        height
            .parse()
            .with_context(|| format!("invalid DA block height {:?}", height))
    }

    pub async fn celestia_bridge_init(&self, node_store: &str, env: Vec<String>) -> Result<()> {
        self.exec(
            strings(&["celestia", "bridge", "init", "--node.store", node_store]),
            env,
        )
        .await
        .with_context(|| format!("node {}: celestia bridge init", self.name))?;
        Ok(())
    }

    /// Launches the bridge in the background
    pub async fn celestia_bridge_start(&self, start: &BridgeStart, env: Vec<String>) -> Result<()> {
        self.exec_job(start.command(), env, true)
            .await
            .with_context(|| format!("node {}: celestia bridge start", self.name))?;
        Ok(())
    }

    /// Admin token of the bridge node's RPC
    pub async fn bridge_auth_token(&self, node_store: &str) -> Result<String> {
        let output = self
            .exec(
                strings(&["celestia", "bridge", "auth", "admin", "--node.store", node_store]),
                Vec::new(),
            )
            .await
            .with_context(|| format!("node {}: celestia bridge auth", self.name))?;
        Ok(output.stdout_trimmed())
    }

    pub async fn light_node_init(&self, node_store: &str, p2p_network: &str, env: Vec<String>) -> Result<()> {
        self.exec(
            strings(&[
                "celestia",
                "light",
                "init",
                "--node.store",
                node_store,
                "--p2p.network",
                p2p_network,
            ]),
            env,
        )
        .await
        .with_context(|| format!("node {}: celestia light init", self.name))?;
        Ok(())
    }

    /// Launches a light node in the background
    pub async fn light_node_start(&self, start: &LightNodeStart, env: Vec<String>) -> Result<()> {
        self.exec_job(start.command(), env, true)
            .await
            .with_context(|| format!("node {}: celestia light start", self.name))?;
        Ok(())
    }

    /// Admin token of the light node's RPC
    pub async fn light_node_auth_token(&self, node_store: &str) -> Result<String> {
        let output = self
            .exec(
                strings(&["celestia", "light", "auth", "admin", "--node.store", node_store]),
                Vec::new(),
            )
            .await
            .with_context(|| format!("node {}: celestia light auth", self.name))?;
        Ok(output.stdout_trimmed())
    }
}

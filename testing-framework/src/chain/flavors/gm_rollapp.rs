// File: testing-framework/src/chain/flavors/gm_rollapp.rs
//
// Rollkit `gm` rollapp
//
// The aggregator posts blocks to a celestia DA node, so the container command
// carries the DA address, namespace, auth token and start height. Those are
// only known once the DA side is running and are set right before `start`.

use crate::chain::{Chain, ChainCore, FlavorHooks, RollAppChain};
use crate::node::Node;
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use rollup_e2e_common::genesis::{self, set_rollkit_sequencer};
use rollup_e2e_common::ChainConfig;

/// Namespace the aggregator writes under unless told otherwise
pub const DEFAULT_DA_NAMESPACE: &str = "00000000000000000000000000000000000000000008e5f679bf7116cb";

#[derive(Debug, Clone, PartialEq, Eq)]
struct DaSettings {
    address: String,
    namespace: String,
    auth_token: String,
    start_height: u64,
}

/// Hooks and DA settings of a rollkit rollapp
pub struct GmRollApp {
    da: RwLock<DaSettings>,
}

impl Default for GmRollApp {
    fn default() -> Self {
        Self {
            da: RwLock::new(DaSettings {
                address: String::new(),
                namespace: DEFAULT_DA_NAMESPACE.to_string(),
                auth_token: String::new(),
                start_height: 0,
            }),
        }
    }
}

impl GmRollApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// DA node RPC, e.g. `http://<bridge host>:26658`
    pub fn set_da_address(&self, address: impl Into<String>) {
        self.da.write().address = address.into();
    }

    pub fn set_namespace(&self, namespace: impl Into<String>) {
        self.da.write().namespace = namespace.into();
    }

    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.da.write().auth_token = token.into();
    }

    pub fn auth_token(&self) -> String {
        self.da.read().auth_token.clone()
    }

    pub fn set_da_block_height(&self, height: u64) {
        self.da.write().start_height = height;
    }

    pub fn da_block_height(&self) -> u64 {
        self.da.read().start_height
    }

    /// Aggregator start command for `node`
    pub fn start_command(&self, config: &ChainConfig, node: &Node) -> Vec<String> {
        let da = self.da.read();
        vec![
            config.bin.clone(),
            "start".to_string(),
            "--rollkit.aggregator".to_string(),
            format!("--rollkit.da_auth_token={}", da.auth_token),
            "--rollkit.da_address".to_string(),
            da.address.clone(),
            "--rollkit.da_namespace".to_string(),
            da.namespace.clone(),
            "--rollkit.da_start_height".to_string(),
            da.start_height.to_string(),
            "--home".to_string(),
            node.home_dir(),
        ]
    }
}

#[async_trait]
impl FlavorHooks for GmRollApp {
    fn name(&self) -> &'static str {
        "rollapp-gm"
    }

    /// Makes validator0's consensus key the single genesis validator
    ///
    /// Every node gets the same resulting genesis.
    async fn post_genesis(&self, chain: &ChainCore) -> Result<()> {
        let validator0 = chain.get_node();
        let key = validator0.priv_validator_key().await?;
        let mut doc = genesis::parse(&validator0.genesis_file_content().await?)?;
        set_rollkit_sequencer(&mut doc, &key).context("setting rollkit sequencer")?;
        let genesis = genesis::render(&doc)?;
        for node in chain.nodes().nodes() {
            node.overwrite_genesis_file(&genesis).await?;
        }
        Ok(())
    }

    fn container_command(&self, config: &ChainConfig, node: &Node) -> Option<Vec<String>> {
        Some(self.start_command(config, node))
    }

    fn waits_for_liveness(&self) -> bool {
        false
    }
}

impl RollAppChain for Chain<GmRollApp> {
    fn chain_id(&self) -> &str {
        &self.config().chain_id
    }

    fn denom(&self) -> &str {
        &self.config().denom
    }

    fn bech32_prefix(&self) -> &str {
        &self.config().bech32_prefix
    }

    // Rollkit rollapps do not register a sequencer with a hub.
    fn sequencer(&self) -> Option<String> {
        None
    }

    fn sequencer_key_dir(&self) -> Option<String> {
        None
    }
}

impl Chain<GmRollApp> {
    pub fn set_da_address(&self, address: impl Into<String>) {
        self.flavor.set_da_address(address);
    }

    pub fn set_namespace(&self, namespace: impl Into<String>) {
        self.flavor.set_namespace(namespace);
    }

    pub fn set_auth_token(&self, token: impl Into<String>) {
        self.flavor.set_auth_token(token);
    }

    pub fn set_da_block_height(&self, height: u64) {
        self.flavor.set_da_block_height(height);
    }
}

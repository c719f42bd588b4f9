// File: testing-framework/src/chain/flavors/celes_hub.rs
//
// Celestia-backed hub
//
// Nodes run the image's start script. Once blocks are produced, validator0
// registers its EVM address, hands its keyring to the DA bridge and the
// bridge is started against the chain, trusting block 1.

use crate::chain::{Chain, ChainCore, FlavorHooks, RollAppChain};
use crate::node::{bridge_store, BridgeStart, Node};
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use rollup_e2e_common::config::{CELESTIA_HOST_DIR, VALIDATOR_KEY_NAME};
use rollup_e2e_common::ChainConfig;
use std::sync::Arc;

/// Block whose hash the bridge trusts
const TRUSTED_HEIGHT: u64 = 1;

/// Hooks of a Celestia-backed hub
#[derive(Default)]
pub struct CelesHub {
    rollapp: RwLock<Option<Arc<dyn RollAppChain>>>,
}

impl CelesHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rollapp(&self, rollapp: Arc<dyn RollAppChain>) {
        *self.rollapp.write() = Some(rollapp);
    }

    pub fn get_rollapp(&self) -> Option<Arc<dyn RollAppChain>> {
        self.rollapp.read().clone()
    }

    /// Initializes and launches the DA bridge next to validator0
    async fn start_bridge(&self, chain: &ChainCore) -> Result<()> {
        let validator0 = chain.get_node();
        validator0
            .register_evm_validator(VALIDATOR_KEY_NAME)
            .await
            .context("registering EVM validator")?;

        let store = bridge_store();
        chain
            .env()
            .files
            .copy_dir(
                validator0.volume(),
                "keyring-test",
                CELESTIA_HOST_DIR,
                "bridge/keys/keyring-test",
            )
            .await
            .context("copying keyring to the bridge store")?;

        let hash = validator0
            .block_hash(TRUSTED_HEIGHT)
            .await
            .with_context(|| format!("failed to fetch hash of block height {}", TRUSTED_HEIGHT))?;
        let env = vec![format!("CELESTIA_CUSTOM=test:{}", hash)];

        validator0.celestia_bridge_init(&store, env.clone()).await?;
        let start = BridgeStart {
            node_store: store,
            core_ip: format!("tcp://{}", validator0.name()),
            account_name: VALIDATOR_KEY_NAME.to_string(),
            gateway_addr: "0.0.0.0".to_string(),
            rpc_addr: "0.0.0.0".to_string(),
        };
        validator0.celestia_bridge_start(&start, env).await
    }
}

#[async_trait]
impl FlavorHooks for CelesHub {
    fn name(&self) -> &'static str {
        "hub-celes"
    }

    fn container_command(&self, _config: &ChainConfig, node: &Node) -> Option<Vec<String>> {
        Some(vec![
            "/bin/bash".to_string(),
            "/opt/start.sh".to_string(),
            node.home_dir(),
        ])
    }

    async fn post_start(&self, chain: &Arc<ChainCore>) -> Result<()> {
        self.start_bridge(chain).await
    }
}

impl Chain<CelesHub> {
    pub fn set_rollapp(&self, rollapp: Arc<dyn RollAppChain>) {
        self.flavor.set_rollapp(rollapp);
    }

    pub fn get_rollapp(&self) -> Option<Arc<dyn RollAppChain>> {
        self.flavor.get_rollapp()
    }

    /// Admin token of the running bridge, what rollkit aggregators pass to the DA
    pub async fn bridge_auth_token(&self) -> Result<String> {
        self.get_node().bridge_auth_token(&bridge_store()).await
    }

    /// Current DA height, a start height for aggregators
    pub async fn da_block_height(&self) -> Result<u64> {
        self.get_node().da_block_height().await
    }

    /// Bridge RPC address reachable from other containers
    pub fn bridge_address(&self) -> String {
        format!("http://{}:26658", self.get_node().name())
    }
}

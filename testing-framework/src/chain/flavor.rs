// File: testing-framework/src/chain/flavor.rs
//
// Chain Flavor Hooks
//
// Every chain runs the same configure/start pipeline. A flavor plugs into it
// at a few fixed points and keeps whatever extra state it needs (attached
// rollapps, the sequencer key directory, DA settings) on itself.

use super::ChainCore;
use crate::node::{Node, VmType};
use anyhow::Result;
use async_trait::async_trait;
use rollup_e2e_common::ChainConfig;
use std::sync::Arc;

/// Extension points of the chain lifecycle
///
/// All hooks default to doing nothing, which is exactly the plain cosmos
/// chain.
#[async_trait]
pub trait FlavorHooks: Send + Sync + 'static {
    /// Short tag used in logs
    fn name(&self) -> &'static str;

    /// Runs on each validator after its genesis account exists and before its gentx
    async fn validator_genesis(&self, _config: &ChainConfig, _validator: &Node) -> Result<()> {
        Ok(())
    }

    /// Runs after every node contributed to genesis, before validator0 merges
    async fn pre_genesis(&self, _chain: &ChainCore) -> Result<()> {
        Ok(())
    }

    /// Last edit of the assembled genesis, after the config's own hook
    fn adjust_genesis(&self, _config: &ChainConfig, genesis: Vec<u8>) -> Result<Vec<u8>> {
        Ok(genesis)
    }

    /// Runs once every node holds the final genesis
    async fn post_genesis(&self, _chain: &ChainCore) -> Result<()> {
        Ok(())
    }

    /// Container command; `None` keeps the node's default start command
    fn container_command(&self, _config: &ChainConfig, _node: &Node) -> Option<Vec<String>> {
        None
    }

    /// Whether `start` waits for new blocks before returning
    fn waits_for_liveness(&self) -> bool {
        true
    }

    /// Runs once every container is up
    async fn post_start(&self, _chain: &Arc<ChainCore>) -> Result<()> {
        Ok(())
    }

    /// Rollapps that `post_start` registers
    fn attached_rollapps(&self) -> usize {
        0
    }
}

/// Plain cosmos-sdk chain
#[derive(Debug, Clone, Copy, Default)]
pub struct CosmosFlavor;

impl FlavorHooks for CosmosFlavor {
    fn name(&self) -> &'static str {
        "cosmos"
    }
}

/// What a hub needs to know about a rollapp it settles
///
/// Implemented by the rollapp chains, so hubs hold them without knowing the
/// concrete flavor.
pub trait RollAppChain: Send + Sync {
    fn chain_id(&self) -> &str;

    fn denom(&self) -> &str;

    fn bech32_prefix(&self) -> &str;

    /// Sequencer consensus key, known once the rollapp is configured
    fn sequencer(&self) -> Option<String>;

    /// Home directory holding the sequencer keyring, known once configured
    fn sequencer_key_dir(&self) -> Option<String>;

    fn vm_type(&self) -> VmType {
        VmType::from_bech32_prefix(self.bech32_prefix())
    }
}

// File: testing-framework/src/chain/flavors/dym_rollapp.rs
//
// Dymension rollapp
//
// Blocks are produced by the dymint sequencer, which only runs once the hub
// registered it, so starting a rollapp never waits for blocks. Validator0
// is the sequencer: its valoper is written into genesis, its consensus key
// is what the hub registers and its home holds the sequencer keyring.

use crate::chain::{Chain, ChainCore, FlavorHooks, RollAppChain};
use crate::node::{KeyEncoding, Node, VmType};
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use rollup_e2e_common::config::{GENESIS_EVENT_AMOUNT, VALIDATOR_KEY_NAME};
use rollup_e2e_common::genesis::{self, fund_hub_genesis_module, set_genesis_operator};
use rollup_e2e_common::{ChainConfig, ConfigError};
use serde_json::json;

/// Native denom description read by `create-rollapp`, in the sequencer key dir
pub const NATIVE_DENOM_FILE: &str = "native_denom.json";
/// Sequencer description read by `create-sequencer`, in the sequencer key dir
pub const SEQUENCER_METADATA_FILE: &str = "metadata_sequencer.json";

/// Hooks and sequencer state of a Dymension rollapp
#[derive(Default)]
pub struct DymRollApp {
    sequencer: RwLock<Option<String>>,
    key_dir: RwLock<Option<String>>,
    genesis_override: RwLock<Option<Vec<u8>>>,
}

impl DymRollApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distributes `genesis` verbatim instead of the assembled one
    ///
    /// Used to restart a rollapp from an exported state.
    pub fn with_genesis(self, genesis: Vec<u8>) -> Self {
        *self.genesis_override.write() = Some(genesis);
        self
    }

    pub fn sequencer(&self) -> Option<String> {
        self.sequencer.read().clone()
    }

    pub fn key_dir(&self) -> Option<String> {
        self.key_dir.read().clone()
    }

    async fn write_registration_files(&self, chain: &ChainCore, validator0: &Node) -> Result<()> {
        let config = chain.config();
        let native_denom = json!({
            "display": config.denom.to_uppercase(),
            "base": config.denom,
            "exponent": config.decimals(),
        });
        let metadata = json!({
            "moniker": validator0.moniker(),
            "details": format!("sequencer of {}", config.chain_id),
        });
        for (file, value) in [(NATIVE_DENOM_FILE, native_denom), (SEQUENCER_METADATA_FILE, metadata)] {
            let content =
                serde_json::to_vec_pretty(&value).map_err(|e| ConfigError::json(file, e))?;
            validator0.write_file(file, &content).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FlavorHooks for DymRollApp {
    fn name(&self) -> &'static str {
        "rollapp-dym"
    }

    async fn validator_genesis(&self, _config: &ChainConfig, validator: &Node) -> Result<()> {
        if validator.index() != 0 {
            return Ok(());
        }
        let valoper = validator
            .key_bech32(VALIDATOR_KEY_NAME, KeyEncoding::Validator)
            .await
            .context("failed to retrieve val bech32")?;
        let mut doc = genesis::parse(&validator.genesis_file_content().await?)?;
        set_genesis_operator(&mut doc, &valoper)?;
        log::info!("{}: genesis_operator_address {}", validator.name(), valoper);
        validator.overwrite_genesis_file(&genesis::render(&doc)?).await
    }

    fn adjust_genesis(&self, config: &ChainConfig, genesis_bytes: Vec<u8>) -> Result<Vec<u8>> {
        if let Some(genesis) = self.genesis_override.read().clone() {
            return Ok(genesis);
        }
        let mut doc = genesis::parse(&genesis_bytes)?;
        if VmType::from_bech32_prefix(&config.bech32_prefix) == VmType::Evm {
            fund_hub_genesis_module(&mut doc, &config.denom, GENESIS_EVENT_AMOUNT)
                .context("adding hub genesis module balance")?;
        }
        Ok(genesis::render(&doc)?)
    }

    async fn post_genesis(&self, chain: &ChainCore) -> Result<()> {
        let validator0 = chain.get_node();
        let sequencer = validator0
            .show_sequencer()
            .await
            .with_context(|| format!("failed to show seq {}", chain.name()))?;
        self.write_registration_files(chain, validator0).await?;
        *self.sequencer.write() = Some(sequencer);
        *self.key_dir.write() = Some(validator0.home_dir());
        Ok(())
    }

    fn container_command(&self, config: &ChainConfig, node: &Node) -> Option<Vec<String>> {
        Some(vec![
            config.bin.clone(),
            "start".to_string(),
            "--home".to_string(),
            node.home_dir(),
        ])
    }

    fn waits_for_liveness(&self) -> bool {
        false
    }
}

impl RollAppChain for Chain<DymRollApp> {
    fn chain_id(&self) -> &str {
        &self.config().chain_id
    }

    fn denom(&self) -> &str {
        &self.config().denom
    }

    fn bech32_prefix(&self) -> &str {
        &self.config().bech32_prefix
    }

    fn sequencer(&self) -> Option<String> {
        self.flavor.sequencer()
    }

    fn sequencer_key_dir(&self) -> Option<String> {
        self.flavor.key_dir()
    }
}

impl Chain<DymRollApp> {
    /// Sequencer consensus key, read fresh from validator0
    pub async fn show_sequencer(&self) -> Result<String> {
        self.get_node().show_sequencer().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollup_e2e_common::ChainType;
    use rollup_e2e_common::RollAppVendor;

    fn config(prefix: &str) -> ChainConfig {
        ChainConfig::new(
            ChainType::RollApp(RollAppVendor::Dymension),
            "rollapp1",
            "rollappevm_1234-1",
            "rollappd",
            "urax",
            prefix,
        )
    }

    const GENESIS: &str = r#"{"app_state":{"bank":{"balances":[],"supply":[{"denom":"urax","amount":"100"}]}}}"#;

    #[test]
    fn test_evm_genesis_funds_hub_genesis_module() {
        let flavor = DymRollApp::new();
        let out = flavor
            .adjust_genesis(&config("ethm"), GENESIS.as_bytes().to_vec())
            .unwrap();
        let doc = genesis::parse(&out).unwrap();
        assert_eq!(
            doc["app_state"]["bank"]["supply"][0]["amount"],
            (100 + GENESIS_EVENT_AMOUNT).to_string()
        );
        assert_eq!(doc["app_state"]["bank"]["balances"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_wasm_genesis_is_untouched() {
        let flavor = DymRollApp::new();
        let out = flavor
            .adjust_genesis(&config("rol"), GENESIS.as_bytes().to_vec())
            .unwrap();
        let doc = genesis::parse(&out).unwrap();
        assert_eq!(doc["app_state"]["bank"]["supply"][0]["amount"], "100");
    }

    #[test]
    fn test_genesis_override_wins() {
        let flavor = DymRollApp::new().with_genesis(b"{\"forked\":true}".to_vec());
        let out = flavor
            .adjust_genesis(&config("ethm"), GENESIS.as_bytes().to_vec())
            .unwrap();
        assert_eq!(out, b"{\"forked\":true}");
    }

    #[test]
    fn test_no_liveness_wait() {
        assert!(!DymRollApp::new().waits_for_liveness());
        assert!(DymRollApp::new().sequencer().is_none());
    }
}

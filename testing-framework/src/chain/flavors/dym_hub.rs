// File: testing-framework/src/chain/flavors/dym_hub.rs
//
// Dymension hub
//
// A settlement hub that rollapps register with. Rollapps are attached before
// the hub is configured: configuration then writes their genesis accounts
// files on validator0, and start registers each rollapp and its sequencer
// once the hub produces blocks.

use crate::chain::{Chain, ChainCore, FlavorHooks, RollAppChain};
use crate::node::{RollAppRegistration, SequencerRegistration};
use crate::utilities::random_lowercase;
use crate::waiters::poll_until;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use rollup_e2e_common::config::{
    FAUCET_KEY_NAME, GENESIS_EVENT_AMOUNT, LIVENESS_BLOCKS, SEQUENCER_FUNDING_AMOUNT, SEQUENCER_KEY_NAME,
    VALIDATOR_KEY_NAME,
};
use rollup_e2e_common::genesis::{DenomMetadata, GenesisAccount, JsonCoin};
use rollup_e2e_common::response::{EpochInfosResponse, RollappState, StateIndexResponse};
use rollup_e2e_common::{Coin, ConfigError, WalletData};
use std::sync::Arc;
use std::time::Duration;

/// Bond a sequencer puts up when registering
pub const SEQUENCER_BOND_AMOUNT: u128 = 1_000_000_000;
/// Denom metadata file passed to `create-rollapp`, in validator0's home
pub const DENOM_METADATA_FILE: &str = "denommetadata.json";

const FINALIZATION_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// `<rollapp id>_genesis_accounts.json`, in validator0's home
pub fn genesis_accounts_file(rollapp_id: &str) -> String {
    format!("{}_genesis_accounts.json", rollapp_id)
}

/// Hooks and rollapp registry of a Dymension hub
#[derive(Default)]
pub struct DymHub {
    rollapps: RwLock<Vec<Arc<dyn RollAppChain>>>,
}

impl DymHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a rollapp; it is registered when the hub starts
    pub fn set_rollapp(&self, rollapp: Arc<dyn RollAppChain>) {
        self.rollapps.write().push(rollapp);
    }

    pub fn get_rollapps(&self) -> Vec<Arc<dyn RollAppChain>> {
        self.rollapps.read().clone()
    }

    /// Detaches every rollapp with this chain id
    pub fn remove_rollapp(&self, chain_id: &str) -> bool {
        let mut rollapps = self.rollapps.write();
        let before = rollapps.len();
        rollapps.retain(|r| r.chain_id() != chain_id);
        rollapps.len() != before
    }

    /// Writes one genesis accounts file per attached rollapp on validator0
    ///
    /// Each file grants validator0's account the genesis event amount of the
    /// rollapp's denom.
    pub async fn write_genesis_accounts(&self, chain: &ChainCore) -> Result<()> {
        let rollapps = self.get_rollapps();
        if rollapps.is_empty() {
            return Ok(());
        }
        let validator0 = chain.get_node();
        let address = validator0.account_key_bech32(VALIDATOR_KEY_NAME).await?;
        for rollapp in rollapps {
            let accounts = vec![GenesisAccount {
                amount: JsonCoin {
                    denom: rollapp.denom().to_string(),
                    amount: GENESIS_EVENT_AMOUNT.to_string(),
                },
                address: address.clone(),
            }];
            let content = serde_json::to_vec_pretty(&accounts)
                .map_err(|e| ConfigError::json("genesis accounts", e))?;
            let file = genesis_accounts_file(rollapp.chain_id());
            validator0.write_file(&file, &content).await?;
            log::info!("file saved to {}/{}", validator0.home_dir(), file);
        }
        Ok(())
    }

    /// Registers every attached rollapp and its sequencer on the hub
    pub async fn register_rollapps(&self, chain: &ChainCore) -> Result<()> {
        for rollapp in self.get_rollapps() {
            self.register_rollapp(chain, rollapp.as_ref())
                .await
                .with_context(|| format!("registering rollapp {}", rollapp.chain_id()))?;
        }
        Ok(())
    }

    async fn register_rollapp(&self, chain: &ChainCore, rollapp: &dyn RollAppChain) -> Result<()> {
        let rollapp_id = rollapp.chain_id();
        let key_dir = rollapp
            .sequencer_key_dir()
            .ok_or_else(|| anyhow!("rollapp {} has no sequencer key dir, configure it first", rollapp_id))?;
        let sequencer_pubkey = rollapp
            .sequencer()
            .ok_or_else(|| anyhow!("rollapp {} has no sequencer, configure it first", rollapp_id))?;
        log::info!("registering rollapp {} with key dir {}", rollapp_id, key_dir);

        let hub = chain.get_node();
        hub.create_key_with_key_dir(SEQUENCER_KEY_NAME, &key_dir).await?;
        let sequencer_address = hub
            .key_bech32_with_key_dir(SEQUENCER_KEY_NAME, &key_dir)
            .await?;
        let funding = WalletData {
            address: sequencer_address.clone(),
            denom: chain.config().denom.clone(),
            amount: SEQUENCER_FUNDING_AMOUNT,
        };
        chain
            .send_funds(FAUCET_KEY_NAME, &funding)
            .await
            .context("funding sequencer")?;

        let metadata = vec![DenomMetadata::rollapp_native(rollapp_id, rollapp.denom())];
        let content = serde_json::to_vec_pretty(&metadata)
            .map_err(|e| ConfigError::json("denom metadata", e))?;
        hub.write_file(DENOM_METADATA_FILE, &content).await?;

        let genesis_account_address = hub.account_key_bech32(VALIDATOR_KEY_NAME).await?;
        let registration = RollAppRegistration {
            rollapp_id: rollapp_id.to_string(),
            alias: random_lowercase(5),
            vm: rollapp.vm_type(),
            bech32_prefix: rollapp.bech32_prefix().to_string(),
            sequencer_address,
            genesis_account_address,
            genesis_event_amount: GENESIS_EVENT_AMOUNT,
            metadata_path: format!("{}/{}", hub.home_dir(), DENOM_METADATA_FILE),
            native_denom_path: format!("{}/native_denom.json", key_dir),
            key_dir: key_dir.clone(),
            genesis_accounts_path: chain.config().genesis_accounts_path.then(|| {
                format!("{}/{}", hub.home_dir(), genesis_accounts_file(rollapp_id))
            }),
        };
        // create-rollapp goes out twice; only the second result is checked.
        if let Err(e) = hub.register_rollapp(&registration).await {
            log::debug!("first create-rollapp for {} failed: {:#}", rollapp_id, e);
        }
        hub.register_rollapp(&registration).await?;

        let sequencer = SequencerRegistration {
            sequencer_pubkey,
            rollapp_id: rollapp_id.to_string(),
            bond: Coin::new(SEQUENCER_BOND_AMOUNT, chain.config().denom.clone()),
            metadata_path: format!("{}/metadata_sequencer.json", key_dir),
            key_dir,
        };
        hub.register_sequencer(&sequencer).await?;
        Ok(())
    }
}

#[async_trait]
impl FlavorHooks for DymHub {
    fn name(&self) -> &'static str {
        "hub-dym"
    }

    async fn pre_genesis(&self, chain: &ChainCore) -> Result<()> {
        self.write_genesis_accounts(chain).await
    }

    async fn post_start(&self, chain: &Arc<ChainCore>) -> Result<()> {
        self.register_rollapps(chain).await
    }

    fn attached_rollapps(&self) -> usize {
        self.rollapps.read().len()
    }
}

impl Chain<DymHub> {
    pub fn set_rollapp(&self, rollapp: Arc<dyn RollAppChain>) {
        self.flavor.set_rollapp(rollapp);
    }

    pub fn get_rollapps(&self) -> Vec<Arc<dyn RollAppChain>> {
        self.flavor.get_rollapps()
    }

    pub fn remove_rollapp(&self, chain_id: &str) -> bool {
        self.flavor.remove_rollapp(chain_id)
    }

    /// Genesis accounts plus registration for rollapps attached after start
    pub async fn setup_rollapps_on_running_hub(&self) -> Result<()> {
        self.flavor.write_genesis_accounts(&self.core).await?;
        self.get_node().wait_for_blocks(LIVENESS_BLOCKS).await?;
        self.flavor
            .register_rollapps(&self.core)
            .await
            .with_context(|| format!("failed to start chain {}", self.name()))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn query_rollapp_state(&self, rollapp_id: &str, only_finalized: bool) -> Result<RollappState> {
        self.get_node().query_rollapp_state(rollapp_id, only_finalized).await
    }

    pub async fn query_latest_state_index(
        &self,
        rollapp_id: &str,
        only_finalized: bool,
    ) -> Result<StateIndexResponse> {
        self.get_node()
            .query_latest_state_index(rollapp_id, only_finalized)
            .await
    }

    pub async fn query_epoch_infos(&self) -> Result<EpochInfosResponse> {
        self.get_node().query_epoch_infos().await
    }

    /// Last height covered by the latest finalized state update
    pub async fn finalized_rollapp_state_height(&self, rollapp_id: &str) -> Result<u64> {
        let state = self.query_rollapp_state(rollapp_id, true).await?;
        let last = state
            .state_info
            .block_descriptors
            .bd
            .last()
            .ok_or_else(|| anyhow!("no block descriptors found for rollapp {}", rollapp_id))?;
        last.height
            .parse()
            .with_context(|| format!("invalid block descriptor height {:?}", last.height))
    }

    /// Hub height the latest finalized state update was created at
    pub async fn finalized_rollapp_dym_height(&self, rollapp_id: &str) -> Result<u64> {
        let state = self.query_rollapp_state(rollapp_id, true).await?;
        let height = &state.state_info.creation_height;
        height
            .parse()
            .with_context(|| format!("invalid creation height {:?}", height))
    }

    pub async fn finalized_rollapp_state_index(&self, rollapp_id: &str) -> Result<u64> {
        let response = self.query_latest_state_index(rollapp_id, true).await?;
        let index = &response.state_index.index;
        if index.is_empty() {
            return Err(anyhow!("no latest finalized index found for rollapp {}", rollapp_id));
        }
        index
            .parse()
            .with_context(|| format!("invalid state index {:?}", index))
    }

    /// Polls the finalized state until it covers `height`
    ///
    /// Query failures count as "not yet". Gives up with a
    /// [`rollup_e2e_common::WaitTimeoutError`] after `timeout`.
    pub async fn wait_until_rollapp_height_is_finalized(
        &self,
        rollapp_id: &str,
        height: u64,
        timeout: Duration,
    ) -> Result<bool> {
        let clock = self.env().clock.clone();
        poll_until(
            format!("specified rollapp height {}", height),
            FINALIZATION_POLL_INTERVAL,
            timeout,
            clock.as_ref(),
            || async move {
                match self.query_rollapp_state(rollapp_id, true).await {
                    Ok(state) => Ok(state.heights().any(|h| h == height).then_some(true)),
                    Err(e) => {
                        log::debug!("querying rollapp {} state: {:#}", rollapp_id, e);
                        Ok(None)
                    }
                }
            },
        )
        .await
    }

    /// Polls epoch infos until the `identifier` epoch moves on
    pub async fn wait_until_epoch_ends(&self, identifier: &str, timeout: Duration) -> Result<bool> {
        let base = self
            .query_epoch_infos()
            .await
            .context("error querying epoch infos")?
            .current_epoch(identifier);
        let clock = self.env().clock.clone();
        poll_until(
            format!("specified epochs {} change", identifier),
            FINALIZATION_POLL_INTERVAL,
            timeout,
            clock.as_ref(),
            || async move {
                match self.query_epoch_infos().await {
                    Ok(infos) => {
                        let current = infos.current_epoch(identifier);
                        Ok((current.is_some() && current != base).then_some(true))
                    }
                    Err(e) => {
                        log::debug!("querying epoch infos: {:#}", e);
                        Ok(None)
                    }
                }
            },
        )
        .await
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    pub async fn fullfill_demand_order(&self, order_id: &str, key: &str) -> Result<String> {
        self.get_node().fulfill_demand_order(key, order_id).await
    }

    pub async fn unbond(&self, key: &str, key_dir: Option<&str>) -> Result<String> {
        self.get_node().unbond(key, key_dir).await
    }

    pub async fn finalize_packets_until_height(
        &self,
        key: &str,
        rollapp_id: &str,
        height: u64,
    ) -> Result<String> {
        self.get_node()
            .finalize_packets_until_height(key, rollapp_id, height)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRollApp(&'static str);

    impl RollAppChain for FakeRollApp {
        fn chain_id(&self) -> &str {
            self.0
        }

        fn denom(&self) -> &str {
            "urax"
        }

        fn bech32_prefix(&self) -> &str {
            "rol"
        }

        fn sequencer(&self) -> Option<String> {
            None
        }

        fn sequencer_key_dir(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_rollapp_registry() {
        let hub = DymHub::new();
        hub.set_rollapp(Arc::new(FakeRollApp("rollapp_1-1")));
        hub.set_rollapp(Arc::new(FakeRollApp("rollapp_2-1")));
        assert_eq!(hub.attached_rollapps(), 2);

        assert!(hub.remove_rollapp("rollapp_1-1"));
        assert!(!hub.remove_rollapp("rollapp_1-1"));
        let ids: Vec<String> = hub
            .get_rollapps()
            .iter()
            .map(|r| r.chain_id().to_string())
            .collect();
        assert_eq!(ids, ["rollapp_2-1"]);
    }

    #[test]
    fn test_genesis_accounts_file_name() {
        assert_eq!(
            genesis_accounts_file("rollappevm_1234-1"),
            "rollappevm_1234-1_genesis_accounts.json"
        );
    }
}

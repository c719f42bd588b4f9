// File: testing-framework/src/node/hub.rs
//
// Dymension hub transactions and queries
//
// Run on a hub node. Rollapp registration signs with the sequencer key kept
// in the rollapp's sequencer keyring, so those transactions pass the keyring
// directory explicitly.

use super::keys::{sequencer_keyring_dir, KeyEncoding};
use super::Node;
use anyhow::{Context, Result};
use rollup_e2e_common::config::SEQUENCER_KEY_NAME;
use rollup_e2e_common::response::{EpochInfosResponse, RollappState, StateIndexResponse};
use rollup_e2e_common::{Coin, ConfigError};
use serde::de::DeserializeOwned;

/// EVM address registered for hub validators on Celestia-backed hubs
pub const QGB_EVM_ADDRESS: &str = "0x966e6f22781EF6a6A82BBB4DB3df8E225DfD9488";

/// Execution environment of a rollapp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmType {
    Evm,
    Wasm,
}

impl VmType {
    /// EVM rollapps use the `ethm` bech32 prefix
    pub fn from_bech32_prefix(prefix: &str) -> Self {
        if prefix == "ethm" {
            VmType::Evm
        } else {
            VmType::Wasm
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VmType::Evm => "EVM",
            VmType::Wasm => "WASM",
        }
    }

    /// Initial supply declared when registering the rollapp
    pub fn initial_supply(self) -> &'static str {
        match self {
            VmType::Evm => "100000000010100000000000000000000",
            VmType::Wasm => "10200000000000000000000",
        }
    }
}

/// Arguments of `rollapp create-rollapp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollAppRegistration {
    pub rollapp_id: String,
    pub alias: String,
    pub vm: VmType,
    pub bech32_prefix: String,
    /// Hub address of the sequencer key
    pub sequencer_address: String,
    /// Hub account funded by the rollapp's genesis event
    pub genesis_account_address: String,
    pub genesis_event_amount: u128,
    pub metadata_path: String,
    pub native_denom_path: String,
    /// Rollapp home holding the sequencer keyring
    pub key_dir: String,
    pub genesis_accounts_path: Option<String>,
}

impl RollAppRegistration {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "rollapp".to_string(),
            "create-rollapp".to_string(),
            self.rollapp_id.clone(),
            self.alias.clone(),
            self.vm.as_str().to_string(),
            "--bech32-prefix".to_string(),
            self.bech32_prefix.clone(),
            "--init-sequencer".to_string(),
            self.sequencer_address.clone(),
            "--genesis-checksum".to_string(),
            "aaa".to_string(),
            "--metadata".to_string(),
            self.metadata_path.clone(),
            "--genesis-accounts".to_string(),
            format!(
                "{}:{}",
                self.genesis_account_address, self.genesis_event_amount
            ),
            "--native-denom".to_string(),
            self.native_denom_path.clone(),
            "--initial-supply".to_string(),
            self.vm.initial_supply().to_string(),
            "--broadcast-mode".to_string(),
            "async".to_string(),
            "--keyring-dir".to_string(),
            sequencer_keyring_dir(&self.key_dir),
        ];
        if let Some(path) = &self.genesis_accounts_path {
            args.push("--genesis-accounts-path".to_string());
            args.push(path.clone());
        }
        args
    }
}

/// Arguments of `sequencer create-sequencer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerRegistration {
    /// Consensus public key printed by `dymint show-sequencer`
    pub sequencer_pubkey: String,
    pub rollapp_id: String,
    pub bond: Coin,
    pub metadata_path: String,
    pub key_dir: String,
}

impl SequencerRegistration {
    pub fn args(&self) -> Vec<String> {
        vec![
            "sequencer".to_string(),
            "create-sequencer".to_string(),
            self.sequencer_pubkey.clone(),
            self.rollapp_id.clone(),
            self.bond.to_string(),
            self.metadata_path.clone(),
            "--broadcast-mode".to_string(),
            "async".to_string(),
            "--keyring-dir".to_string(),
            sequencer_keyring_dir(&self.key_dir),
            "--gas".to_string(),
            "auto".to_string(),
        ]
    }
}

fn borrowed(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

fn decode<T: DeserializeOwned>(what: &str, raw: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(raw).map_err(|e| ConfigError::json(what, e))?)
}

impl Node {
    pub async fn register_rollapp(&self, registration: &RollAppRegistration) -> Result<String> {
        self.exec_tx(SEQUENCER_KEY_NAME, &borrowed(&registration.args()))
            .await
            .with_context(|| format!("registering rollapp {}", registration.rollapp_id))
    }

    pub async fn register_sequencer(&self, registration: &SequencerRegistration) -> Result<String> {
        self.exec_tx(SEQUENCER_KEY_NAME, &borrowed(&registration.args()))
            .await
            .with_context(|| {
                format!("registering sequencer of rollapp {}", registration.rollapp_id)
            })
    }

    /// `sequencer unbond`, optionally signing from a sequencer keyring
    pub async fn unbond(&self, key: &str, key_dir: Option<&str>) -> Result<String> {
        let keyring_dir = key_dir.map(sequencer_keyring_dir);
        let mut args = vec!["sequencer", "unbond", "--broadcast-mode", "async", "--gas", "auto"];
        if let Some(dir) = keyring_dir.as_deref() {
            args.extend_from_slice(&["--keyring-dir", dir]);
        }
        self.exec_tx(key, &args).await
    }

    /// `qgb register <valoper> <evm address>`
    pub async fn register_evm_validator(&self, key: &str) -> Result<String> {
        let valoper = self.key_bech32(key, KeyEncoding::Validator).await?;
        self.exec_tx(
            key,
            &[
                "qgb",
                "register",
                valoper.as_str(),
                QGB_EVM_ADDRESS,
                "--broadcast-mode",
                "block",
            ],
        )
        .await
    }

    pub async fn fulfill_demand_order(&self, key: &str, order_id: &str) -> Result<String> {
        self.exec_tx(key, &["eibc", "fulfill-order", order_id, "--gas", "auto"])
            .await
    }

    pub async fn finalize_packets_until_height(
        &self,
        key: &str,
        rollapp_id: &str,
        height: u64,
    ) -> Result<String> {
        let height = height.to_string();
        self.exec_tx(
            key,
            &[
                "delayedack",
                "finalize-packets-until-height",
                rollapp_id,
                height.as_str(),
                "--gas",
                "auto",
            ],
        )
        .await
    }

    /// Latest (or latest finalized) state update of a rollapp
    pub async fn query_rollapp_state(&self, rollapp_id: &str, only_finalized: bool) -> Result<RollappState> {
        let mut args = vec!["rollapp", "state", rollapp_id];
        if only_finalized {
            args.push("--finalized");
        }
        decode("rollapp state", &self.exec_query(&args).await?)
    }

    pub async fn query_latest_state_index(
        &self,
        rollapp_id: &str,
        only_finalized: bool,
    ) -> Result<StateIndexResponse> {
        let mut args = vec!["rollapp", "latest-state-index", rollapp_id];
        if only_finalized {
            args.push("--finalized");
        }
        decode("latest state index", &self.exec_query(&args).await?)
    }

    pub async fn query_epoch_infos(&self) -> Result<EpochInfosResponse> {
        decode("epoch infos", &self.exec_query(&["epochs", "epoch-infos"]).await?)
    }

    /// Sequencer consensus key of a rollapp node, as registered on the hub
    pub async fn show_sequencer(&self) -> Result<String> {
        Ok(self.exec_bin(&["dymint", "show-sequencer"]).await?.stdout_trimmed())
    }
}

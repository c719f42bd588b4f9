// File: testing-framework/src/node/genesis.rs
//
// Home directory bootstrap and the node's share of genesis assembly.

use super::Node;
use anyhow::{anyhow, Context, Result};
use rollup_e2e_common::coin::format_coins;
use rollup_e2e_common::config::{BLOCK_TIME, KEYRING_BACKEND};
use rollup_e2e_common::genesis::{self, PrivValidatorKey};
use rollup_e2e_common::toml_override::{apply_overrides, override_table, TomlOverrides};
use rollup_e2e_common::Coin;
use serde_json::{json, Value};
use std::time::Duration;

pub(crate) const GENESIS_FILE: &str = "config/genesis.json";
pub(crate) const NODE_KEY_FILE: &str = "config/node_key.json";
pub(crate) const PRIV_VALIDATOR_KEY_FILE: &str = "config/priv_validator_key.json";
pub(crate) const CONFIG_TOML: &str = "config/config.toml";
pub(crate) const APP_TOML: &str = "config/app.toml";

const ADD_GENESIS_ACCOUNT_TIMEOUT: Duration = Duration::from_secs(60);

fn as_table(value: Value) -> TomlOverrides {
    match value {
        Value::Object(map) => map,
        _ => TomlOverrides::new(),
    }
}

/// Baseline `config.toml` overrides every test node runs with
pub fn test_config_toml() -> TomlOverrides {
    as_table(json!({
        "log_level": "info",
        "p2p": {
            "allow_duplicate_ip": true,
            "addr_book_strict": false,
        },
        "consensus": {
            "timeout_commit": BLOCK_TIME,
            "timeout_propose": BLOCK_TIME,
        },
        "rpc": {
            "laddr": "tcp://0.0.0.0:26657",
            "allowed_origins": ["*"],
        },
    }))
}

/// Baseline `app.toml` overrides every test node runs with
pub fn test_app_toml(gas_prices: &str) -> TomlOverrides {
    as_table(json!({
        "minimum-gas-prices": gas_prices,
        "grpc": {
            "address": "0.0.0.0:9090",
        },
        "api": {
            "enable": true,
            "swagger": true,
            "address": "tcp://0.0.0.0:1317",
        },
    }))
}

impl Node {
    /// `init <moniker> --chain-id <id>`
    pub async fn init_home_folder(&self) -> Result<()> {
        let moniker = self.moniker();
        self.exec_bin(&["init", moniker.as_str(), "--chain-id", self.config.chain_id.as_str()])
            .await
            .map(|_| ())
    }

    /// Home init plus the baseline test configuration
    pub async fn init_full_node_files(&self) -> Result<()> {
        self.init_home_folder().await?;
        self.set_test_config().await
    }

    /// Permissive p2p, fixed block time and public RPC/gRPC/API listeners
    pub async fn set_test_config(&self) -> Result<()> {
        self.modify_toml_file(CONFIG_TOML, &test_config_toml()).await?;
        self.modify_toml_file(APP_TOML, &test_app_toml(&self.config.gas_prices))
            .await
    }

    /// Applies nested overrides to a TOML file relative to the home directory
    pub async fn modify_toml_file(&self, rel_path: &str, overrides: &TomlOverrides) -> Result<()> {
        let current = self.read_file(rel_path).await?;
        let current = String::from_utf8(current)
            .map_err(|_| rollup_e2e_common::ConfigError::InvalidUtf8)
            .with_context(|| format!("node {}: {}", self.name, rel_path))?;
        let updated = apply_overrides(rel_path, &current, overrides)
            .with_context(|| format!("node {}: applying overrides", self.name))?;
        self.write_file(rel_path, updated.as_bytes()).await
    }

    /// Applies the chain's per-file overrides
    ///
    /// Every override must be a table; anything else fails before any file
    /// is touched.
    pub async fn apply_config_file_overrides(&self) -> Result<()> {
        let mut tables = Vec::with_capacity(self.config.config_file_overrides.len());
        for (file, value) in &self.config.config_file_overrides {
            tables.push((file.clone(), override_table(file, value)?.clone()));
        }
        for (file, table) in tables {
            self.modify_toml_file(&file, &table).await?;
        }
        Ok(())
    }

    /// Points the node at its peers
    pub async fn set_peers(&self, peers: &str) -> Result<()> {
        let overrides = as_table(json!({ "p2p": { "persistent_peers": peers } }));
        self.modify_toml_file(CONFIG_TOML, &overrides).await
    }

    async fn genesis_command<'a>(&self, sub: &[&'a str]) -> Result<Vec<&'a str>> {
        let mut command = Vec::with_capacity(sub.len() + 1);
        if self.supports_genesis_subcommand().await? {
            command.push("genesis");
        }
        command.extend_from_slice(sub);
        Ok(command)
    }

    /// Funds `address` in the local genesis
    pub async fn add_genesis_account(&self, address: &str, coins: &[Coin]) -> Result<()> {
        let amount = format_coins(coins);
        let mut command = self
            .genesis_command(&["add-genesis-account", address, amount.as_str()])
            .await?;
        if self.config.using_chain_id_flag_cli {
            command.extend_from_slice(&["--chain-id", self.config.chain_id.as_str()]);
        }

        let _guard = self.lock.lock().await;
        tokio::time::timeout(ADD_GENESIS_ACCOUNT_TIMEOUT, self.exec_bin(&command))
            .await
            .map_err(|_| anyhow!("node {}: add-genesis-account timed out", self.name))??;
        Ok(())
    }

    /// Self-delegation transaction signed by `key`
    pub async fn gentx(&self, key: &str, self_delegation: &Coin) -> Result<()> {
        let amount = self_delegation.to_string();
        let command = self
            .genesis_command(&[
                "gentx",
                key,
                amount.as_str(),
                "--keyring-backend",
                KEYRING_BACKEND,
                "--chain-id",
                self.config.chain_id.as_str(),
            ])
            .await?;

        let _guard = self.lock.lock().await;
        self.exec_bin(&command).await.map(|_| ())
    }

    /// Merges every gentx in `config/gentx` into the local genesis
    pub async fn collect_gentxs(&self) -> Result<()> {
        let command = self.genesis_command(&["collect-gentxs"]).await?;
        let _guard = self.lock.lock().await;
        self.exec_bin(&command).await.map(|_| ())
    }

    /// Copies this node's gentx into `dst`'s gentx folder
    pub async fn copy_gentx(&self, dst: &Node) -> Result<()> {
        let node_id = self.node_id().await?;
        let rel_path = format!("config/gentx/gentx-{}.json", node_id);
        let gentx = self.read_file(&rel_path).await?;
        dst.write_file(&rel_path, &gentx)
            .await
            .with_context(|| format!("copying gentx from {} to {}", self.name, dst.name))
    }

    pub async fn genesis_file_content(&self) -> Result<Vec<u8>> {
        self.read_file(GENESIS_FILE).await
    }

    pub async fn overwrite_genesis_file(&self, content: &[u8]) -> Result<()> {
        self.write_file(GENESIS_FILE, content).await
    }

    /// Uppercase SHA-256 of the local genesis
    pub async fn genesis_hash(&self) -> Result<String> {
        Ok(genesis::genesis_hash(&self.genesis_file_content().await?))
    }

    /// P2P identity derived from `config/node_key.json`
    pub async fn node_id(&self) -> Result<String> {
        let key = self.read_file(NODE_KEY_FILE).await?;
        genesis::node_id(&key).with_context(|| format!("node {}: parsing node key", self.name))
    }

    pub async fn priv_validator_key(&self) -> Result<PrivValidatorKey> {
        let key = self.read_file(PRIV_VALIDATOR_KEY_FILE).await?;
        serde_json::from_slice(&key)
            .map_err(|e| rollup_e2e_common::ConfigError::json("priv_validator_key.json", e))
            .with_context(|| format!("node {}", self.name))
    }

    /// `export --height <h>`, returning the exported state JSON
    ///
    /// Older SDKs print the export to stderr, newer ones to stdout.
    pub async fn export_state(&self, height: u64) -> Result<String> {
        let height = height.to_string();
        let _guard = self.lock.lock().await;
        let output = self.exec_bin(&["export", "--height", height.as_str()]).await?;
        let out = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Wipes blockchain data, keeping keys and config
    pub async fn unsafe_reset_all(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.exec_bin(&["tendermint", "unsafe-reset-all"]).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_config_shape() {
        let config = test_config_toml();
        assert_eq!(config["consensus"]["timeout_commit"], "2s");
        assert_eq!(config["p2p"]["addr_book_strict"], false);
        assert_eq!(config["rpc"]["laddr"], "tcp://0.0.0.0:26657");

        let app = test_app_toml("0.0adym");
        assert_eq!(app["minimum-gas-prices"], "0.0adym");
        assert_eq!(app["api"]["enable"], true);
    }

    #[test]
    fn test_baseline_applies_to_default_config() {
        let default = "[p2p]\naddr_book_strict = true\n[consensus]\ntimeout_commit = \"5s\"\n";
        let out = apply_overrides(CONFIG_TOML, default, &test_config_toml()).unwrap();
        assert!(out.contains("addr_book_strict = false"));
        assert!(out.contains("timeout_commit = \"2s\""));
        assert!(out.contains("allow_duplicate_ip = true"));
    }
}

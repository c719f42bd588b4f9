// File: testing-framework/src/node/tx.rs

use super::Node;
use anyhow::{Context, Result};
use rollup_e2e_common::config::TX_SETTLE_BLOCKS;
use rollup_e2e_common::genesis::content_hash;
use rollup_e2e_common::response::{BalanceResponse, TxResponse};
use rollup_e2e_common::WalletData;
use serde_json::Value;

impl Node {
    /// Signs and broadcasts `tx <args..>` with `key` and returns the tx hash
    ///
    /// A non-zero result code comes back as a [`rollup_e2e_common::TxError`]
    /// (reachable through `downcast_ref`) which still carries the hash.
    /// Except on rollapps, the call returns only after a few more blocks so
    /// the effect is visible to the next query.
    pub async fn exec_tx(&self, key: &str, args: &[&str]) -> Result<String> {
        let _guard = self.lock.lock().await;
        let output = self
            .exec(self.tx_command(key, args), Vec::new())
            .await
            .with_context(|| format!("node {}: tx {}", self.name, args.join(" ")))?;
        let txhash = TxResponse::parse(&output.stdout)
            .with_context(|| format!("node {}: decoding tx result", self.name))?
            .into_result()
            .with_context(|| format!("node {}: tx {}", self.name, args.join(" ")))?;

        if !self.config.chain_type.is_rollapp() {
            self.wait_for_blocks(TX_SETTLE_BLOCKS).await?;
        }
        Ok(txhash)
    }

    /// `query <args..>`, returning the raw JSON
    pub async fn exec_query(&self, args: &[&str]) -> Result<Vec<u8>> {
        self.exec(self.query_command(args), Vec::new())
            .await
            .map(|output| output.stdout)
            .with_context(|| format!("node {}: query {}", self.name, args.join(" ")))
    }

    pub async fn get_balance(&self, address: &str, denom: &str) -> Result<u128> {
        let raw = self
            .exec_query(&["bank", "balances", address, "--denom", denom])
            .await?;
        let balance: BalanceResponse = serde_json::from_slice(&raw)
            .map_err(|e| rollup_e2e_common::ConfigError::json("balance response", e))?;
        Ok(balance.amount)
    }

    /// `bank send` from `key` to the wallet's address
    pub async fn send_funds(&self, key: &str, wallet: &WalletData) -> Result<String> {
        let amount = wallet.coin().to_string();
        self.exec_tx(key, &["bank", "send", key, wallet.address.as_str(), amount.as_str()])
            .await
    }

    // ========================================================================
    // Governance
    // ========================================================================

    /// Writes `proposal.json` to the home directory and submits it
    pub async fn submit_proposal(&self, key: &str, proposal: &Value) -> Result<String> {
        let content = serde_json::to_vec_pretty(proposal)?;
        self.write_file("proposal.json", &content).await?;
        let path = format!("{}/proposal.json", self.home_dir());
        self.exec_tx(key, &["gov", "submit-proposal", path.as_str(), "--gas", "auto"])
            .await
    }

    /// Legacy param-change proposal, stored as `<sha256>.json`
    pub async fn param_change_proposal(&self, key: &str, proposal: &Value) -> Result<String> {
        let content = serde_json::to_vec_pretty(proposal)?;
        let file = format!("{}.json", content_hash(&content));
        self.write_file(&file, &content).await?;
        let path = format!("{}/{}", self.home_dir(), file);
        self.exec_tx(
            key,
            &[
                "gov",
                "submit-legacy-proposal",
                "param-change",
                path.as_str(),
                "--gas",
                "auto",
            ],
        )
        .await
    }

    pub async fn vote_on_proposal(&self, key: &str, proposal_id: u64, option: &str) -> Result<String> {
        let id = proposal_id.to_string();
        self.exec_tx(key, &["gov", "vote", id.as_str(), option, "--gas", "auto"])
            .await
    }
}

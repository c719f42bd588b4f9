// JSON shapes printed by chain binaries with `--output json`.

use crate::error::{ConfigError, TxError};
use serde::{Deserialize, Deserializer, Serialize};

/// Broadcast result of any `tx` command
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxResponse {
    pub txhash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
}

impl TxResponse {
    pub fn parse(stdout: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(stdout).map_err(|e| ConfigError::json("tx response", e))
    }

    /// Maps a non-zero application code to [`TxError`]
    pub fn into_result(self) -> Result<String, TxError> {
        if self.code != 0 {
            return Err(TxError {
                code: self.code,
                raw_log: self.raw_log,
                txhash: self.txhash,
            });
        }
        Ok(self.txhash)
    }
}

fn u128_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn u64_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

/// `query bank balances <addr> --denom <denom>`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BalanceResponse {
    pub denom: String,
    #[serde(deserialize_with = "u128_from_str")]
    pub amount: u128,
}

/// `query block <height>` as printed by celestia-appd
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    pub block_id: BlockId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockId {
    pub hash: String,
}

/// `curl <node>:26657/block` on a DA node
#[derive(Debug, Clone, Deserialize)]
pub struct RpcBlockResponse {
    pub result: RpcBlockResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcBlockResult {
    pub block: RpcBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcBlock {
    pub header: RpcBlockHeader,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcBlockHeader {
    pub height: String,
}

// ===== Dymension hub queries =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateStatus {
    #[default]
    Unspecified,
    Received,
    Finalized,
}

impl<'de> Deserialize<'de> for StateStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match String::deserialize(deserializer)?.as_str() {
            "STATE_STATUS_RECEIVED" => StateStatus::Received,
            "STATE_STATUS_FINALIZED" => StateStatus::Finalized,
            _ => StateStatus::Unspecified,
        })
    }
}

/// `query rollapp state <id> [--finalized]`
#[derive(Debug, Clone, Deserialize)]
pub struct RollappState {
    #[serde(rename = "stateInfo")]
    pub state_info: StateInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateInfo {
    #[serde(rename = "stateInfoIndex")]
    pub state_info_index: StateIndex,
    #[serde(default)]
    pub sequencer: String,
    #[serde(rename = "startHeight", default)]
    pub start_height: String,
    #[serde(rename = "numBlocks", default)]
    pub num_blocks: String,
    #[serde(rename = "creationHeight", default)]
    pub creation_height: String,
    #[serde(default)]
    pub status: StateStatus,
    #[serde(rename = "BDs", default)]
    pub block_descriptors: BlockDescriptors,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockDescriptors {
    #[serde(rename = "BD", default)]
    pub bd: Vec<BlockDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockDescriptor {
    pub height: String,
    #[serde(rename = "stateRoot", default)]
    pub state_root: String,
}

impl RollappState {
    /// Heights covered by this state update, skipping unparsable entries
    pub fn heights(&self) -> impl Iterator<Item = u64> + '_ {
        self.state_info
            .block_descriptors
            .bd
            .iter()
            .filter_map(|bd| bd.height.parse().ok())
    }
}

/// `query rollapp latest-state-index <id> [--finalized]`
#[derive(Debug, Clone, Deserialize)]
pub struct StateIndexResponse {
    #[serde(rename = "stateIndex")]
    pub state_index: StateIndex,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateIndex {
    #[serde(rename = "rollappId")]
    pub rollapp_id: String,
    pub index: String,
}

/// `query epochs epoch-infos`
#[derive(Debug, Clone, Deserialize)]
pub struct EpochInfosResponse {
    pub epochs: Vec<EpochInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpochInfo {
    pub identifier: String,
    #[serde(deserialize_with = "u64_from_str")]
    pub current_epoch: u64,
}

impl EpochInfosResponse {
    pub fn current_epoch(&self, identifier: &str) -> Option<u64> {
        self.epochs
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| e.current_epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_response_success() {
        let tx = TxResponse::parse(br#"{"height":"0","txhash":"AB12","code":0,"raw_log":""}"#).unwrap();
        assert_eq!(tx.into_result().unwrap(), "AB12");
    }

    #[test]
    fn test_tx_response_failure_keeps_hash_and_log() {
        let tx = TxResponse::parse(br#"{"txhash":"FF00","code":13,"raw_log":"insufficient fee"}"#).unwrap();
        let err = tx.into_result().unwrap_err();
        assert_eq!(err.txhash, "FF00");
        assert_eq!(err.to_string(), "transaction failed with code 13: insufficient fee");
    }

    #[test]
    fn test_tx_response_missing_code_means_success() {
        let tx = TxResponse::parse(br#"{"txhash":"AA"}"#).unwrap();
        assert_eq!(tx.code, 0);
    }

    #[test]
    fn test_rollapp_state_heights() {
        let json = br#"{"stateInfo":{
            "stateInfoIndex":{"rollappId":"rollapp_1-1","index":"3"},
            "sequencer":"dym1seq","startHeight":"10","numBlocks":"3",
            "creationHeight":"55","status":"STATE_STATUS_FINALIZED",
            "BDs":{"BD":[{"height":"10"},{"height":"bad"},{"height":"12"}]}
        }}"#;
        let state: RollappState = serde_json::from_slice(json).unwrap();
        assert_eq!(state.state_info.status, StateStatus::Finalized);
        assert_eq!(state.heights().collect::<Vec<_>>(), vec![10, 12]);
    }

    #[test]
    fn test_epoch_lookup() {
        let json = br#"{"epochs":[
            {"identifier":"hour","current_epoch":"4"},
            {"identifier":"minute","current_epoch":"250"}
        ]}"#;
        let infos: EpochInfosResponse = serde_json::from_slice(json).unwrap();
        assert_eq!(infos.current_epoch("minute"), Some(250));
        assert_eq!(infos.current_epoch("week"), None);
    }

    #[test]
    fn test_balance_amount_is_string() {
        let b: BalanceResponse =
            serde_json::from_slice(br#"{"denom":"adym","amount":"100000000000000000000000"}"#).unwrap();
        assert_eq!(b.amount, 100_000_000_000_000_000_000_000);
    }
}

// Genesis document helpers.
//
// The genesis is handled mostly as raw bytes: validator0 assembles it through
// the chain binary and the harness only touches a few well-known paths. No
// typed genesis schema is kept here since it changes with every SDK release.

use crate::config::DEFAULT_BOND_DENOM;
use crate::error::ConfigError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Rewrites every `"stake"` token of the raw JSON into `"<denom>"`
///
/// This is a literal text substitution, so a `"stake"` string anywhere in
/// the document (a memo for instance) is rewritten too.
pub fn replace_bond_denom(genesis: &[u8], denom: &str) -> Result<Vec<u8>, ConfigError> {
    let text = std::str::from_utf8(genesis).map_err(|_| ConfigError::InvalidUtf8)?;
    let from = format!("\"{}\"", DEFAULT_BOND_DENOM);
    let to = format!("\"{}\"", denom);
    Ok(text.replace(&from, &to).into_bytes())
}

/// Uppercase hex SHA-256 of a genesis file, as logged before start
pub fn genesis_hash(genesis: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(genesis))
}

/// Lowercase hex SHA-256, used to name param-change proposal files
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn parse(genesis: &[u8]) -> Result<Value, ConfigError> {
    serde_json::from_slice(genesis).map_err(|e| ConfigError::json("genesis.json", e))
}

pub fn render(genesis: &Value) -> Result<Vec<u8>, ConfigError> {
    serde_json::to_vec(genesis).map_err(|e| ConfigError::json("genesis.json", e))
}

/// Looks up a nested object path
pub fn get_path<'a>(doc: &'a Value, path: &[&str]) -> Result<&'a Value, ConfigError> {
    path.iter().try_fold(doc, |node, key| {
        node.get(key)
            .ok_or_else(|| ConfigError::MissingGenesisField(path.join(".")))
    })
}

/// Sets a nested object path, creating missing intermediate objects
pub fn set_path(doc: &mut Value, path: &[&str], value: Value) -> Result<(), ConfigError> {
    let Some((last, parents)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };

    let mut node = doc;
    for key in parents {
        let map = node
            .as_object_mut()
            .ok_or_else(|| ConfigError::MissingGenesisField(path.join(".")))?;
        node = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    node.as_object_mut()
        .ok_or_else(|| ConfigError::MissingGenesisField(path.join(".")))?
        .insert(last.to_string(), value);
    Ok(())
}

// ===== Node identity =====

#[derive(Debug, Deserialize)]
struct NodeKeyFile {
    priv_key: KeyValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyValue {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

/// Node id encoded in `config/node_key.json`
///
/// The id is the hex of the first 20 bytes of SHA-256 over the ed25519
/// public key, which is the second half of the 64 byte private key.
pub fn node_id(node_key_json: &[u8]) -> Result<String, ConfigError> {
    let key: NodeKeyFile =
        serde_json::from_slice(node_key_json).map_err(|e| ConfigError::json("node_key.json", e))?;
    let raw = BASE64
        .decode(key.priv_key.value.as_bytes())
        .map_err(|e| ConfigError::InvalidNodeKey(e.to_string()))?;
    if raw.len() != 64 {
        return Err(ConfigError::InvalidNodeKey(format!(
            "expected 64 byte ed25519 key, got {} bytes",
            raw.len()
        )));
    }
    let digest = Sha256::digest(&raw[32..]);
    Ok(hex::encode(&digest[..20]))
}

/// `config/priv_validator_key.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivValidatorKey {
    pub address: String,
    pub pub_key: KeyValue,
    pub priv_key: KeyValue,
}

/// Power given to the single rollkit sequencer validator
pub const ROLLKIT_SEQUENCER_POWER: &str = "50000000000000";
pub const ROLLKIT_SEQUENCER_NAME: &str = "Rollkit Sequencer";

/// Makes `key` the only genesis validator
pub fn set_rollkit_sequencer(genesis: &mut Value, key: &PrivValidatorKey) -> Result<(), ConfigError> {
    get_path(genesis, &["consensus"])?;
    let validators = serde_json::json!([{
        "address": key.address,
        "pub_key": {
            "type": key.pub_key.key_type,
            "value": key.pub_key.value,
        },
        "power": ROLLKIT_SEQUENCER_POWER,
        "name": ROLLKIT_SEQUENCER_NAME,
    }]);
    set_path(genesis, &["consensus", "validators"], validators)
}

// ===== Dymension rollapp =====

/// Module account of the hub genesis module on EVM rollapps
pub const HUB_GENESIS_MODULE_ADDRESS: &str = "ethm1748tamme3jj3v9wq95fc3pmglxtqscljdy7483";

/// Records the operator allowed to act as sequencer at genesis
pub fn set_genesis_operator(genesis: &mut Value, valoper: &str) -> Result<(), ConfigError> {
    set_path(
        genesis,
        &["app_state", "sequencers", "genesis_operator_address"],
        Value::String(valoper.to_string()),
    )
}

/// Funds the hub genesis module account and grows the first supply entry accordingly
pub fn fund_hub_genesis_module(
    genesis: &mut Value,
    denom: &str,
    amount: u128,
) -> Result<(), ConfigError> {
    let mut balances = get_path(genesis, &["app_state", "bank", "balances"])?
        .as_array()
        .cloned()
        .ok_or_else(|| ConfigError::MissingGenesisField("app_state.bank.balances".to_string()))?;
    balances.push(serde_json::json!({
        "address": HUB_GENESIS_MODULE_ADDRESS,
        "coins": [{"denom": denom, "amount": amount.to_string()}],
    }));
    set_path(genesis, &["app_state", "bank", "balances"], Value::Array(balances))?;

    let supply = genesis
        .pointer_mut("/app_state/bank/supply/0/amount")
        .ok_or_else(|| ConfigError::MissingGenesisField("app_state.bank.supply.0.amount".to_string()))?;
    let current: u128 = supply
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ConfigError::MissingGenesisField("app_state.bank.supply.0.amount".to_string()))?;
    *supply = Value::String(current.saturating_add(amount).to_string());
    Ok(())
}

// ===== Hub side files =====

/// Coin as the SDK encodes it in JSON, amount as a decimal string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonCoin {
    pub denom: String,
    pub amount: String,
}

/// Entry of `<rollappID>_genesis_accounts.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisAccount {
    pub amount: JsonCoin,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DenomUnit {
    pub denom: String,
    pub exponent: u32,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Bank denom metadata, as written to `denommetadata.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DenomMetadata {
    pub description: String,
    pub denom_units: Vec<DenomUnit>,
    pub base: String,
    pub display: String,
    pub name: String,
    pub symbol: String,
}

impl DenomMetadata {
    /// Metadata registered on the hub for a rollapp's native token
    pub fn rollapp_native(rollapp_id: &str, denom: &str) -> Self {
        Self {
            description: format!("rollapp {} native token", rollapp_id),
            denom_units: vec![
                DenomUnit {
                    denom: denom.to_string(),
                    exponent: 0,
                    aliases: Vec::new(),
                },
                DenomUnit {
                    denom: "rax".to_string(),
                    exponent: 6,
                    aliases: Vec::new(),
                },
            ],
            base: denom.to_string(),
            display: "rax".to_string(),
            name: format!("{} {}", rollapp_id, denom),
            symbol: "URAX".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replace_bond_denom_is_literal() {
        let genesis = br#"{"bond_denom":"stake","memo":"stake","note":"mistake"}"#;
        let out = replace_bond_denom(genesis, "adym").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"bond_denom":"adym","memo":"adym","note":"mistake"}"#
        );
    }

    #[test]
    fn test_genesis_hash_is_uppercase_sha256() {
        assert_eq!(
            genesis_hash(b""),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }

    #[test]
    fn test_set_and_get_path() {
        let mut doc = json!({"app_state": {"bank": {}}});
        set_path(&mut doc, &["app_state", "sequencers", "genesis_operator_address"], json!("op")).unwrap();
        assert_eq!(
            get_path(&doc, &["app_state", "sequencers", "genesis_operator_address"]).unwrap(),
            &json!("op")
        );
        assert_eq!(
            get_path(&doc, &["app_state", "missing"]).unwrap_err(),
            ConfigError::MissingGenesisField("app_state.missing".to_string())
        );
    }

    #[test]
    fn test_set_path_through_scalar_fails() {
        let mut doc = json!({"app_state": "scalar"});
        assert!(set_path(&mut doc, &["app_state", "x"], json!(1)).is_err());
    }

    #[test]
    fn test_node_id_from_key_file() {
        let mut raw = vec![1u8; 32];
        raw.extend_from_slice(&[2u8; 32]);
        let file = json!({
            "priv_key": {"type": "tendermint/PrivKeyEd25519", "value": BASE64.encode(&raw)}
        });
        let id = node_id(file.to_string().as_bytes()).unwrap();
        let expected = hex::encode(&Sha256::digest([2u8; 32])[..20]);
        assert_eq!(id, expected);
        assert_eq!(id.len(), 40);
    }

    #[test]
    fn test_node_id_rejects_short_key() {
        let file = json!({"priv_key": {"type": "t", "value": BASE64.encode([0u8; 10])}});
        assert!(matches!(
            node_id(file.to_string().as_bytes()),
            Err(ConfigError::InvalidNodeKey(_))
        ));
    }

    #[test]
    fn test_fund_hub_genesis_module() {
        let mut doc = json!({"app_state": {"bank": {
            "balances": [{"address": "ethm1a", "coins": []}],
            "supply": [{"denom": "urax", "amount": "1000"}]
        }}});
        fund_hub_genesis_module(&mut doc, "urax", 500).unwrap();
        let balances = doc.pointer("/app_state/bank/balances").unwrap().as_array().unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[1]["address"], json!(HUB_GENESIS_MODULE_ADDRESS));
        assert_eq!(doc.pointer("/app_state/bank/supply/0/amount").unwrap(), &json!("1500"));
    }

    #[test]
    fn test_rollkit_sequencer_requires_consensus_section() {
        let key = PrivValidatorKey {
            address: "ADDR".to_string(),
            pub_key: KeyValue {
                key_type: "tendermint/PubKeyEd25519".to_string(),
                value: "pub".to_string(),
            },
            priv_key: KeyValue {
                key_type: "tendermint/PrivKeyEd25519".to_string(),
                value: "priv".to_string(),
            },
        };
        let mut without = json!({"app_state": {}});
        assert!(set_rollkit_sequencer(&mut without, &key).is_err());

        let mut with = json!({"consensus": {"params": {}}});
        set_rollkit_sequencer(&mut with, &key).unwrap();
        assert_eq!(with["consensus"]["validators"][0]["power"], json!(ROLLKIT_SEQUENCER_POWER));
        assert_eq!(with["consensus"]["validators"][0]["pub_key"]["value"], json!("pub"));
    }
}

// Chain configuration shared by every chain flavor.
//
// `ChainConfig` is plain data plus optional genesis hooks. Everything except
// the hooks can be loaded from YAML through `ChainSpec`.

use crate::chain_type::ChainType;
use crate::coin::{scale_amount, Coin};
use crate::config::{DEFAULT_COIN_DECIMALS, GENESIS_AMOUNT_BASE, SELF_DELEGATION_BASE};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Transforms the assembled genesis bytes before distribution
pub type ModifyGenesisFn =
    Arc<dyn Fn(&ChainConfig, Vec<u8>) -> anyhow::Result<Vec<u8>> + Send + Sync>;
/// Replaces the default `(genesis balance, self delegation)` of validators
pub type GenesisAmountsFn = Arc<dyn Fn() -> (Coin, Coin) + Send + Sync>;
/// Runs once all validators contributed and before validator0 merges accounts
pub type PreGenesisFn = Arc<dyn Fn(&ChainConfig) -> anyhow::Result<()> + Send + Sync>;

/// Container image a node runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImage {
    pub repository: String,
    pub version: String,
    /// `uid:gid` the container runs as, runtime default when empty
    #[serde(default)]
    pub uid_gid: String,
}

impl DockerImage {
    pub fn new(repository: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            version: version.into(),
            uid_gid: String::new(),
        }
    }

    /// `repository:version`
    pub fn reference(&self) -> String {
        format!("{}:{}", self.repository, self.version)
    }
}

fn default_gas_adjustment() -> f64 {
    1.3
}

/// Configuration of one chain
#[derive(Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(rename = "type", default)]
    pub chain_type: ChainType,
    pub name: String,
    pub chain_id: String,
    pub images: Vec<DockerImage>,
    pub bin: String,
    pub bech32_prefix: String,
    pub denom: String,
    #[serde(default)]
    pub coin_type: String,
    /// Decimal places of `denom`, 6 when unset
    #[serde(default)]
    pub coin_decimals: Option<u32>,
    #[serde(default)]
    pub gas_prices: String,
    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,
    #[serde(default)]
    pub trusting_period: String,
    /// Copy the home folder inside the container instead of running on the bind mount
    #[serde(default)]
    pub no_host_mount: bool,
    /// Skip key creation and gentx for validators
    #[serde(default)]
    pub skip_gen_tx: bool,
    /// Pass `--chain-id` to `add-genesis-account`
    #[serde(default)]
    pub using_chain_id_flag_cli: bool,
    /// Per config file (relative to the node home) nested key/value overrides
    #[serde(default)]
    pub config_file_overrides: BTreeMap<String, Value>,
    /// Pass the rollapp genesis accounts file when registering rollapps on a hub
    #[serde(default)]
    pub genesis_accounts_path: bool,

    #[serde(skip)]
    pub modify_genesis: Option<ModifyGenesisFn>,
    #[serde(skip)]
    pub modify_genesis_amounts: Option<GenesisAmountsFn>,
    #[serde(skip)]
    pub pre_genesis: Option<PreGenesisFn>,
}

impl ChainConfig {
    pub fn new(
        chain_type: ChainType,
        name: impl Into<String>,
        chain_id: impl Into<String>,
        bin: impl Into<String>,
        denom: impl Into<String>,
        bech32_prefix: impl Into<String>,
    ) -> Self {
        Self {
            chain_type,
            name: name.into(),
            chain_id: chain_id.into(),
            images: Vec::new(),
            bin: bin.into(),
            bech32_prefix: bech32_prefix.into(),
            denom: denom.into(),
            coin_type: "118".to_string(),
            coin_decimals: None,
            gas_prices: String::new(),
            gas_adjustment: default_gas_adjustment(),
            trusting_period: "112h".to_string(),
            no_host_mount: false,
            skip_gen_tx: false,
            using_chain_id_flag_cli: false,
            config_file_overrides: BTreeMap::new(),
            genesis_accounts_path: false,
            modify_genesis: None,
            modify_genesis_amounts: None,
            pre_genesis: None,
        }
    }

    pub fn with_image(mut self, image: DockerImage) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_gas_prices(mut self, gas_prices: impl Into<String>) -> Self {
        self.gas_prices = gas_prices.into();
        self
    }

    pub fn with_coin_decimals(mut self, decimals: u32) -> Self {
        self.coin_decimals = Some(decimals);
        self
    }

    pub fn with_config_override(mut self, file: impl Into<String>, overrides: Value) -> Self {
        self.config_file_overrides.insert(file.into(), overrides);
        self
    }

    pub fn with_modify_genesis(mut self, hook: ModifyGenesisFn) -> Self {
        self.modify_genesis = Some(hook);
        self
    }

    pub fn with_pre_genesis(mut self, hook: PreGenesisFn) -> Self {
        self.pre_genesis = Some(hook);
        self
    }

    pub fn with_genesis_amounts(mut self, hook: GenesisAmountsFn) -> Self {
        self.modify_genesis_amounts = Some(hook);
        self
    }

    pub fn decimals(&self) -> u32 {
        self.coin_decimals.unwrap_or(DEFAULT_COIN_DECIMALS)
    }

    /// First image, the one nodes run
    pub fn image(&self) -> Option<&DockerImage> {
        self.images.first()
    }

    /// Genesis balance and self delegation of every validator
    pub fn genesis_amounts(&self) -> Result<(Coin, Coin), ConfigError> {
        if let Some(hook) = &self.modify_genesis_amounts {
            return Ok(hook());
        }
        let decimals = self.decimals();
        Ok((
            Coin::new(scale_amount(GENESIS_AMOUNT_BASE, decimals)?, self.denom.clone()),
            Coin::new(scale_amount(SELF_DELEGATION_BASE, decimals)?, self.denom.clone()),
        ))
    }
}

impl fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConfig")
            .field("chain_type", &self.chain_type)
            .field("name", &self.name)
            .field("chain_id", &self.chain_id)
            .field("bin", &self.bin)
            .field("denom", &self.denom)
            .field("bech32_prefix", &self.bech32_prefix)
            .field("images", &self.images)
            .field("modify_genesis", &self.modify_genesis.is_some())
            .field("pre_genesis", &self.pre_genesis.is_some())
            .finish_non_exhaustive()
    }
}

fn default_validators() -> usize {
    1
}

/// A chain declared in a YAML file: its configuration plus node counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSpec {
    #[serde(flatten)]
    pub config: ChainConfig,
    #[serde(default = "default_validators")]
    pub validators: usize,
    #[serde(default)]
    pub full_nodes: usize,
}

impl ChainSpec {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Json {
            context: "chain spec".to_string(),
            reason: e.to_string(),
        })
    }

    /// Several chains declared as a YAML sequence
    pub fn list_from_yaml(yaml: &str) -> Result<Vec<Self>, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Json {
            context: "chain spec list".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_type::HubVendor;

    const HUB_YAML: &str = r#"
type: hub-dym
name: dymension
chain_id: dymension_100-1
bin: dymd
bech32_prefix: dym
denom: adym
coin_type: "60"
coin_decimals: 18
gas_prices: 0.0adym
images:
  - repository: ghcr.io/decentrio/dymension
    version: debug
config_file_overrides:
  config/config.toml:
    p2p:
      max_num_inbound_peers: 80
validators: 2
"#;

    #[test]
    fn test_chain_spec_from_yaml() {
        let spec = ChainSpec::from_yaml(HUB_YAML).unwrap();
        assert_eq!(spec.config.chain_type, ChainType::Hub(HubVendor::Dymension));
        assert_eq!(spec.validators, 2);
        assert_eq!(spec.full_nodes, 0);
        assert_eq!(spec.config.decimals(), 18);
        assert_eq!(spec.config.gas_adjustment, 1.3);
        assert_eq!(
            spec.config.image().unwrap().reference(),
            "ghcr.io/decentrio/dymension:debug"
        );
        assert!(spec.config.config_file_overrides.contains_key("config/config.toml"));
        assert!(spec.config.modify_genesis.is_none());
    }

    #[test]
    fn test_default_genesis_amounts_scale_with_decimals() {
        let config = ChainConfig::new(ChainType::Cosmos, "gaia", "gaia-1", "gaiad", "uatom", "cosmos");
        let (balance, delegation) = config.genesis_amounts().unwrap();
        assert_eq!(balance, Coin::new(100_000_000_000_000_000_000, "uatom"));
        assert_eq!(delegation, Coin::new(50_000_000_000_000_000_000, "uatom"));
    }

    #[test]
    fn test_genesis_amounts_hook_wins() {
        let config = ChainConfig::new(ChainType::Cosmos, "gaia", "gaia-1", "gaiad", "uatom", "cosmos")
            .with_genesis_amounts(Arc::new(|| (Coin::new(10, "uatom"), Coin::new(5, "uatom"))));
        assert_eq!(
            config.genesis_amounts().unwrap(),
            (Coin::new(10, "uatom"), Coin::new(5, "uatom"))
        );
    }
}

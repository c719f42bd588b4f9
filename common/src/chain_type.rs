use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settlement hub implementations the harness knows how to start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubVendor {
    /// Dymension hub, accepts rollapp and sequencer registrations
    Dymension,
    /// Celestia app with a DA bridge started next to validator0
    Celestia,
}

/// Rollapp implementations the harness knows how to start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollAppVendor {
    /// Dymension rollapp driven by dymint
    Dymension,
    /// Rollkit `gm` rollapp posting to a celestia DA node
    Rollkit,
}

/// Chain flavor tag, written as a hyphen-delimited string
///
/// `"cosmos"`, `"hub-dym"`, `"hub-celes"`, `"rollapp-dym"`, `"rollapp-gm"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChainType {
    #[default]
    Cosmos,
    Hub(HubVendor),
    RollApp(RollAppVendor),
}

impl ChainType {
    pub fn is_rollapp(&self) -> bool {
        matches!(self, ChainType::RollApp(_))
    }

    pub fn is_hub(&self) -> bool {
        matches!(self, ChainType::Hub(_))
    }

    /// Prefix prepended to container names so rollapp nodes sort apart from hub nodes
    pub fn node_name_prefix(&self) -> &'static str {
        match self {
            ChainType::RollApp(RollAppVendor::Dymension) => "ra-",
            _ => "",
        }
    }
}

impl FromStr for ChainType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let kind = parts.next().unwrap_or_default();
        let vendor = parts.next();
        if parts.next().is_some() {
            return Err(ConfigError::UnknownChainType(s.to_string()));
        }

        match (kind, vendor) {
            ("cosmos", None) => Ok(ChainType::Cosmos),
            ("hub", Some("dym")) => Ok(ChainType::Hub(HubVendor::Dymension)),
            ("hub", Some("celes")) => Ok(ChainType::Hub(HubVendor::Celestia)),
            ("rollapp", Some("dym")) => Ok(ChainType::RollApp(RollAppVendor::Dymension)),
            ("rollapp", Some("gm")) => Ok(ChainType::RollApp(RollAppVendor::Rollkit)),
            _ => Err(ConfigError::UnknownChainType(s.to_string())),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ChainType::Cosmos => "cosmos",
            ChainType::Hub(HubVendor::Dymension) => "hub-dym",
            ChainType::Hub(HubVendor::Celestia) => "hub-celes",
            ChainType::RollApp(RollAppVendor::Dymension) => "rollapp-dym",
            ChainType::RollApp(RollAppVendor::Rollkit) => "rollapp-gm",
        };
        f.write_str(tag)
    }
}

impl TryFrom<String> for ChainType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChainType> for String {
    fn from(value: ChainType) -> Self {
        value.to_string()
    }
}

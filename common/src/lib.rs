// File: common/src/lib.rs
//
// Shared, I/O-free building blocks of the rollup e2e harness: chain
// configuration, chain type tags, naming rules, TOML override merging,
// genesis text helpers and the typed leaf errors every layer wraps.

#![allow(clippy::too_many_arguments)]

pub mod chain_config;
pub mod chain_type;
pub mod coin;
pub mod config;
pub mod error;
pub mod genesis;
pub mod naming;
pub mod response;
pub mod toml_override;

pub use chain_config::{ChainConfig, ChainSpec, DockerImage};
pub use chain_type::{ChainType, HubVendor, RollAppVendor};
pub use coin::{Coin, WalletData};
pub use error::{
    ChainStateError, ConfigError, ExecError, KeyringError, TxError, WaitTimeoutError,
};

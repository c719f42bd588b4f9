//! # Rollup E2E Testing
//!
//! Docker based end-to-end harness for Cosmos SDK hubs and rollapps.
//!
//! ## Architecture Overview
//!
//! - **Node**: one validator or full node; drives the chain binary in
//!   one-shot job containers and owns its long-running node container
//! - **NodeSet**: fail-fast parallel batches, peering and genesis hashes
//! - **Chain**: the configure / start / stop lifecycle, shared by every
//!   flavor, with flavor specific behavior plugged in through `FlavorHooks`
//! - **Interchain**: brings up hubs, rollapps and relayers in order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rollup_e2e_testing::prelude::*;
//!
//! #[tokio::test]
//! #[ignore = "needs docker"]
//! async fn test_start_hub() -> anyhow::Result<()> {
//!     let env = TestEnv::docker_setup("TestStartHub").await?;
//!     let hub = ChainBuilder::new("TestStartHub", hub_config())
//!         .with_env(env)
//!         .build(DymHub::new())?;
//!     hub.configure(&[]).await?;
//!     hub.start().await?;
//!     assert!(hub.height().await? >= 5);
//!     hub.stop(false).await
//! }
//! ```
//!
//! ## Design Principles
//!
//! 1. **Seams over mocks**: the container runtime, job executor, file
//!    access, RPC and clock are traits carried in `TestEnv`
//! 2. **Explicit lifecycle**: a chain is configured once and started after
//!    configuration; misuse is a typed error
//! 3. **Fail fast**: per-node batches stop at the first failing node

#![warn(clippy::all)]

/// Test environment and clock
pub mod orchestrator;

/// Container runtime, job executor and volume file contracts
pub mod docker;

/// Node status RPC contract
pub mod rpc;

/// Height and condition pollers
pub mod waiters;

pub mod node;

pub mod node_set;

/// Chain lifecycle, flavor hooks and flavors
pub mod chain;

pub mod relayer;

pub mod interchain;

/// Shared utilities
pub mod utilities;

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::chain::flavors::{CelesHub, DymHub, DymRollApp, GmRollApp};
    pub use crate::chain::{
        AnyChain, Chain, ChainBuilder, ChainCore, ChainState, CosmosFlavor, FlavorHooks,
        RollAppChain,
    };
    pub use crate::interchain::{Interchain, InterchainLink};
    pub use crate::node::Node;
    pub use crate::node_set::NodeSet;
    pub use crate::orchestrator::{Clock, PausedClock, SystemClock, TestEnv};
    pub use crate::relayer::{Relayer, RelayerFactory};
    pub use rollup_e2e_common::{
        ChainConfig, ChainSpec, ChainType, Coin, DockerImage, HubVendor, RollAppVendor, WalletData,
    };
    pub use std::sync::Arc;
}

// Re-export commonly used types at crate root
pub use chain::{AnyChain, Chain, ChainBuilder};
pub use orchestrator::{Clock, PausedClock, SystemClock, TestEnv};

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

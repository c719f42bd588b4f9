// File: testing-framework/src/chain/factory.rs
//
// A chain of any flavor behind one type, for code that handles chains
// generically (interchain assembly, YAML declared chains). Flavor specific
// operations stay reachable through the `as_*` accessors.

use super::flavors::{CelesHub, DymHub, DymRollApp, GmRollApp};
use super::{Chain, ChainCore, CosmosFlavor, RollAppChain};
use crate::node::Node;
use crate::node_set::NodeSet;
use anyhow::Result;
use rollup_e2e_common::{ChainConfig, WalletData};
use std::sync::Arc;

/// A chain of any known flavor
#[derive(Debug, Clone)]
pub enum AnyChain {
    Cosmos(Arc<Chain<CosmosFlavor>>),
    DymHub(Arc<Chain<DymHub>>),
    CelesHub(Arc<Chain<CelesHub>>),
    DymRollApp(Arc<Chain<DymRollApp>>),
    GmRollApp(Arc<Chain<GmRollApp>>),
}

macro_rules! each_flavor {
    ($chain:expr, $c:ident => $body:expr) => {
        match $chain {
            AnyChain::Cosmos($c) => $body,
            AnyChain::DymHub($c) => $body,
            AnyChain::CelesHub($c) => $body,
            AnyChain::DymRollApp($c) => $body,
            AnyChain::GmRollApp($c) => $body,
        }
    };
}

impl AnyChain {
    pub fn core(&self) -> &Arc<ChainCore> {
        each_flavor!(self, c => c.core())
    }

    pub fn config(&self) -> &ChainConfig {
        self.core().config()
    }

    pub fn name(&self) -> &str {
        self.core().name()
    }

    pub fn chain_id(&self) -> &str {
        self.core().chain_id()
    }

    pub fn get_node(&self) -> &Arc<Node> {
        self.core().get_node()
    }

    pub fn nodes(&self) -> NodeSet {
        self.core().nodes()
    }

    /// Flavor tag, e.g. `hub-dym`
    pub fn flavor_name(&self) -> &'static str {
        use super::FlavorHooks;
        each_flavor!(self, c => c.flavor().name())
    }

    pub async fn configure(&self, wallets: &[WalletData]) -> Result<()> {
        each_flavor!(self, c => c.configure(wallets).await)
    }

    pub async fn start(&self) -> Result<()> {
        each_flavor!(self, c => c.start().await)
    }

    pub async fn stop(&self, test_failed: bool) -> Result<()> {
        self.core().stop(test_failed).await
    }

    pub fn is_rollapp(&self) -> bool {
        matches!(self, AnyChain::DymRollApp(_) | AnyChain::GmRollApp(_))
    }

    /// Rollapp capabilities, `None` for hubs and plain chains
    pub fn as_rollapp(&self) -> Option<Arc<dyn RollAppChain>> {
        match self {
            AnyChain::DymRollApp(c) => Some(c.clone() as Arc<dyn RollAppChain>),
            AnyChain::GmRollApp(c) => Some(c.clone() as Arc<dyn RollAppChain>),
            _ => None,
        }
    }

    pub fn as_dym_hub(&self) -> Option<&Arc<Chain<DymHub>>> {
        match self {
            AnyChain::DymHub(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_celes_hub(&self) -> Option<&Arc<Chain<CelesHub>>> {
        match self {
            AnyChain::CelesHub(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_dym_rollapp(&self) -> Option<&Arc<Chain<DymRollApp>>> {
        match self {
            AnyChain::DymRollApp(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_gm_rollapp(&self) -> Option<&Arc<Chain<GmRollApp>>> {
        match self {
            AnyChain::GmRollApp(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Chain<CosmosFlavor>> for AnyChain {
    fn from(chain: Chain<CosmosFlavor>) -> Self {
        AnyChain::Cosmos(Arc::new(chain))
    }
}

impl From<Chain<DymHub>> for AnyChain {
    fn from(chain: Chain<DymHub>) -> Self {
        AnyChain::DymHub(Arc::new(chain))
    }
}

impl From<Chain<CelesHub>> for AnyChain {
    fn from(chain: Chain<CelesHub>) -> Self {
        AnyChain::CelesHub(Arc::new(chain))
    }
}

impl From<Chain<DymRollApp>> for AnyChain {
    fn from(chain: Chain<DymRollApp>) -> Self {
        AnyChain::DymRollApp(Arc::new(chain))
    }
}

impl From<Chain<GmRollApp>> for AnyChain {
    fn from(chain: Chain<GmRollApp>) -> Self {
        AnyChain::GmRollApp(Arc::new(chain))
    }
}

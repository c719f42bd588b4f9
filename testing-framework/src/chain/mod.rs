// File: testing-framework/src/chain/mod.rs
//
// Chain
//
// A chain is N validators plus M full nodes sharing one configuration. The
// lifecycle is a small state machine:
//
//   Unconfigured -> Configuring -> Configured -> Starting -> Running -> Stopped
//
// with `Failed` reachable from the two transient states. Configuration builds
// one genesis on validator0 and hands the same bytes to every node; start
// creates all containers, peers them and brings them up. Flavors hook into
// both phases through `FlavorHooks`.

mod builder;
mod factory;
mod flavor;
pub mod flavors;

pub use builder::ChainBuilder;
pub use factory::AnyChain;
pub use flavor::{CosmosFlavor, FlavorHooks, RollAppChain};

use crate::node::Node;
use crate::node_set::{run_batch, NodeSet};
use crate::orchestrator::TestEnv;
use crate::utilities::export_genesis_from_env;
use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use rollup_e2e_common::config::{
    ENV_SKIP_FAILURE_CLEANUP, LIVENESS_BLOCKS, VALIDATOR_KEY_NAME,
};
use rollup_e2e_common::genesis::replace_bond_denom;
use rollup_e2e_common::{ChainConfig, ChainStateError, WalletData};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Lifecycle position of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Unconfigured,
    Configuring,
    Configured,
    Starting,
    /// Containers are up; `with_rollapps` records whether rollapps were registered
    Running { with_rollapps: bool },
    Stopped,
    /// A transition failed; the chain must be rebuilt
    Failed,
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainState::Unconfigured => f.write_str("unconfigured"),
            ChainState::Configuring => f.write_str("configuring"),
            ChainState::Configured => f.write_str("configured"),
            ChainState::Starting => f.write_str("starting"),
            ChainState::Running { with_rollapps: true } => f.write_str("running with rollapps"),
            ChainState::Running { with_rollapps: false } => f.write_str("running"),
            ChainState::Stopped => f.write_str("stopped"),
            ChainState::Failed => f.write_str("failed"),
        }
    }
}

/// Flavor-independent part of a chain: configuration, nodes and state
pub struct ChainCore {
    config: Arc<ChainConfig>,
    test_name: String,
    env: TestEnv,
    validators: NodeSet,
    full_nodes: NodeSet,
    primary: Arc<Node>,
    state: Mutex<ChainState>,
}

impl ChainCore {
    pub(crate) fn new(
        config: Arc<ChainConfig>,
        env: TestEnv,
        test_name: &str,
        validators: Vec<Arc<Node>>,
        full_nodes: Vec<Arc<Node>>,
    ) -> Result<Self> {
        let primary = validators
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("chain {} needs at least one validator", config.name))?;
        Ok(Self {
            config,
            test_name: test_name.to_string(),
            env,
            validators: NodeSet::new(validators),
            full_nodes: NodeSet::new(full_nodes),
            primary,
            state: Mutex::new(ChainState::Unconfigured),
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn config_arc(&self) -> Arc<ChainConfig> {
        self.config.clone()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn chain_id(&self) -> &str {
        &self.config.chain_id
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn env(&self) -> &TestEnv {
        &self.env
    }

    pub fn state(&self) -> ChainState {
        *self.state.lock()
    }

    /// Validator0, the node genesis is assembled on and queries go to
    pub fn get_node(&self) -> &Arc<Node> {
        &self.primary
    }

    pub fn validators(&self) -> &NodeSet {
        &self.validators
    }

    pub fn full_nodes(&self) -> &NodeSet {
        &self.full_nodes
    }

    /// Validators followed by full nodes
    pub fn nodes(&self) -> NodeSet {
        let mut all = self.validators.nodes().to_vec();
        all.extend_from_slice(self.full_nodes.nodes());
        NodeSet::new(all)
    }

    /// Home directory of validator0 inside containers
    pub fn home_dir(&self) -> String {
        self.primary.home_dir()
    }

    pub async fn height(&self) -> Result<u64> {
        self.primary.height().await
    }

    pub async fn get_balance(&self, address: &str, denom: &str) -> Result<u128> {
        self.primary.get_balance(address, denom).await
    }

    pub async fn send_funds(&self, key: &str, wallet: &WalletData) -> Result<String> {
        self.primary
            .send_funds(key, wallet)
            .await
            .with_context(|| format!("chain {}: sending funds to {}", self.name(), wallet.address))
    }

    pub async fn export_state(&self, height: u64) -> Result<String> {
        self.primary.export_state(height).await
    }

    // ========================================================================
    // State machine
    // ========================================================================

    /// Moves from one of `from` to `to`, or reports the misuse
    fn transition(&self, operation: &'static str, from: &[ChainState], to: ChainState) -> Result<()> {
        let mut state = self.state.lock();
        if !from.contains(&*state) {
            return Err(ChainStateError {
                chain: self.config.name.clone(),
                operation,
                state: state.to_string(),
            }
            .into());
        }
        log::info!("chain {}: {} -> {}", self.config.name, *state, to);
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: ChainState) {
        let mut state = self.state.lock();
        log::info!("chain {}: {} -> {}", self.config.name, *state, to);
        *state = to;
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Stops and removes every node container
    ///
    /// With `test_failed` and [`ENV_SKIP_FAILURE_CLEANUP`] set, containers are
    /// left in place for inspection. Every node is attempted; the first
    /// error is returned.
    pub async fn stop(&self, test_failed: bool) -> Result<()> {
        let keep = test_failed
            && std::env::var(ENV_SKIP_FAILURE_CLEANUP)
                .map(|v| !v.is_empty())
                .unwrap_or(false);
        if keep {
            log::warn!(
                "chain {}: keeping containers of failed test {}",
                self.name(),
                self.test_name
            );
            self.set_state(ChainState::Stopped);
            return Ok(());
        }

        let mut first_error = None;
        for node in self.nodes().nodes() {
            if node.container_id().is_none() {
                continue;
            }
            let result = async {
                node.stop_container().await?;
                node.remove_container().await
            }
            .await;
            if let Err(e) = result {
                log::warn!("chain {}: {:#}", self.name(), e);
                first_error.get_or_insert(e);
            }
        }
        self.set_state(ChainState::Stopped);
        match first_error {
            Some(e) => Err(e.context(format!("failed to stop chain {}", self.name()))),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ChainCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainCore")
            .field("name", &self.config.name)
            .field("chain_id", &self.config.chain_id)
            .field("validators", &self.validators.len())
            .field("full_nodes", &self.full_nodes.len())
            .field("state", &self.state())
            .finish()
    }
}

/// A chain of a given flavor
///
/// Derefs to [`ChainCore`] for everything flavor independent.
pub struct Chain<F: FlavorHooks> {
    core: Arc<ChainCore>,
    flavor: Arc<F>,
}

impl<F: FlavorHooks> Deref for Chain<F> {
    type Target = ChainCore;

    fn deref(&self) -> &ChainCore {
        &self.core
    }
}

impl<F: FlavorHooks> Chain<F> {
    pub(crate) fn new(core: ChainCore, flavor: F) -> Self {
        Self {
            core: Arc::new(core),
            flavor: Arc::new(flavor),
        }
    }

    pub fn core(&self) -> &Arc<ChainCore> {
        &self.core
    }

    pub fn flavor(&self) -> &F {
        &self.flavor
    }

    /// Builds the genesis and distributes it to every node
    ///
    /// Allowed exactly once, on an unconfigured chain. `wallets` are funded
    /// in genesis next to the validators. On error the chain is left
    /// `Failed` and has to be rebuilt.
    pub async fn configure(&self, wallets: &[WalletData]) -> Result<()> {
        self.core.transition(
            "configure",
            &[ChainState::Unconfigured],
            ChainState::Configuring,
        )?;
        match self.configure_nodes(wallets).await {
            Ok(()) => {
                self.core.set_state(ChainState::Configured);
                Ok(())
            }
            Err(e) => {
                self.core.set_state(ChainState::Failed);
                Err(e.context(format!("failed to configure chain {}", self.core.name())))
            }
        }
    }

    async fn configure_nodes(&self, wallets: &[WalletData]) -> Result<()> {
        let core = &self.core;
        let config = core.config_arc();
        let (genesis_balance, self_delegation) = config.genesis_amounts()?;
        let genesis_coins = vec![genesis_balance];

        let flavor = self.flavor.clone();
        let coins = genesis_coins.clone();
        run_batch(core.nodes().nodes(), move |node| {
            let flavor = flavor.clone();
            let coins = coins.clone();
            let self_delegation = self_delegation.clone();
            async move {
                node.init_full_node_files().await?;
                node.apply_config_file_overrides().await?;
                let config = node.chain_config();
                if !node.is_validator() || config.skip_gen_tx {
                    return Ok(());
                }
                node.create_key(VALIDATOR_KEY_NAME).await?;
                let address = node.account_key_bech32(VALIDATOR_KEY_NAME).await?;
                node.add_genesis_account(&address, &coins).await?;
                flavor.validator_genesis(config, &node).await?;
                node.gentx(VALIDATOR_KEY_NAME, &self_delegation).await
            }
        })
        .await?;

        if let Some(hook) = &config.pre_genesis {
            hook(config.as_ref()).context("pre-genesis hook")?;
        }
        self.flavor.pre_genesis(core).await?;

        let validator0 = core.get_node();
        if !config.skip_gen_tx {
            for validator in &core.validators().nodes()[1..] {
                let address = validator.account_key_bech32(VALIDATOR_KEY_NAME).await?;
                validator0.add_genesis_account(&address, &genesis_coins).await?;
                validator.copy_gentx(validator0).await?;
            }
        }
        for wallet in wallets {
            validator0
                .add_genesis_account(&wallet.address, &[wallet.coin()])
                .await?;
        }
        if !config.skip_gen_tx {
            validator0.collect_gentxs().await?;
        }

        let genesis = validator0.genesis_file_content().await?;
        let mut genesis = replace_bond_denom(&genesis, &config.denom)?;
        if let Some(hook) = &config.modify_genesis {
            genesis = hook(config.as_ref(), genesis).context("modify-genesis hook")?;
        }
        let genesis = self.flavor.adjust_genesis(config.as_ref(), genesis)?;

        if let Some(path) = export_genesis_from_env(core.name(), &genesis)? {
            log::debug!("chain {}: genesis exported to {}", core.name(), path.display());
        }

        let genesis = Arc::new(genesis);
        run_batch(core.nodes().nodes(), move |node| {
            let genesis = genesis.clone();
            async move { node.overwrite_genesis_file(&genesis).await }
        })
        .await?;

        self.flavor.post_genesis(core).await
    }

    /// Starts every node and runs the flavor's post-start work
    ///
    /// Containers are created first, then peered and started. Unless the
    /// flavor depends on an external block producer, the call returns only
    /// once the chain made progress.
    pub async fn start(&self) -> Result<()> {
        self.core
            .transition("start", &[ChainState::Configured], ChainState::Starting)?;
        match self.start_nodes().await {
            Ok(()) => {
                self.core.set_state(ChainState::Running {
                    with_rollapps: self.flavor.attached_rollapps() > 0,
                });
                Ok(())
            }
            Err(e) => {
                self.core.set_state(ChainState::Failed);
                Err(e.context(format!("failed to start chain {}", self.core.name())))
            }
        }
    }

    async fn start_nodes(&self) -> Result<()> {
        let core = &self.core;
        let nodes = core.nodes();
        nodes.log_genesis_hashes().await?;

        let flavor = self.flavor.clone();
        run_batch(nodes.nodes(), move |node| {
            let command = flavor
                .container_command(node.chain_config(), &node)
                .unwrap_or_else(|| node.start_command());
            async move { node.create_node_container(command).await }
        })
        .await?;

        let peers = Arc::new(nodes.peer_string().await?);
        run_batch(nodes.nodes(), move |node| {
            let peers = peers.clone();
            async move {
                node.set_peers(&peers).await?;
                node.start_container().await
            }
        })
        .await?;

        if self.flavor.waits_for_liveness() {
            core.get_node().wait_for_blocks(LIVENESS_BLOCKS).await?;
        }
        self.flavor
            .post_start(core)
            .await
            .with_context(|| format!("{} post-start", self.flavor.name()))
    }
}

impl<F: FlavorHooks> fmt::Debug for Chain<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("flavor", &self.flavor.name())
            .field("core", &self.core)
            .finish()
    }
}

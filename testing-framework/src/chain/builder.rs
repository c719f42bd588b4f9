// File: testing-framework/src/chain/builder.rs
//
// ChainBuilder - Fluent API for assembling a chain and its nodes

use super::factory::AnyChain;
use super::flavors::{CelesHub, DymHub, DymRollApp, GmRollApp};
use super::{Chain, ChainCore, CosmosFlavor, FlavorHooks};
use crate::node::Node;
use crate::orchestrator::TestEnv;
use anyhow::{anyhow, bail, Result};
use rollup_e2e_common::{ChainConfig, ChainSpec, ChainType, HubVendor, RollAppVendor};
use std::sync::Arc;

/// Builder for [`Chain`] instances with fluent API
///
/// # Example
///
/// ```rust,ignore
/// use rollup_e2e_testing::chain::ChainBuilder;
///
/// let rollapp = ChainBuilder::new("TestIBCTransfer", rollapp_config)
///     .with_env(env.clone())
///     .with_validators(1)
///     .with_full_nodes(1)
///     .build(DymRollApp::new())?;
/// ```
pub struct ChainBuilder {
    test_name: String,
    config: ChainConfig,

    /// Number of validators, at least one
    validators: usize,

    /// Number of non-validating nodes
    full_nodes: usize,

    env: Option<TestEnv>,
}

impl ChainBuilder {
    /// Create new builder with defaults
    ///
    /// Default configuration:
    /// - 1 validator
    /// - 0 full nodes
    /// - no environment (must be set with [`with_env`](Self::with_env))
    pub fn new(test_name: impl Into<String>, config: ChainConfig) -> Self {
        Self {
            test_name: test_name.into(),
            config,
            validators: 1,
            full_nodes: 0,
            env: None,
        }
    }

    /// Builder preset from a YAML chain declaration
    pub fn from_spec(test_name: impl Into<String>, spec: ChainSpec) -> Self {
        Self::new(test_name, spec.config)
            .with_validators(spec.validators)
            .with_full_nodes(spec.full_nodes)
    }

    pub fn with_validators(mut self, count: usize) -> Self {
        self.validators = count;
        self
    }

    pub fn with_full_nodes(mut self, count: usize) -> Self {
        self.full_nodes = count;
        self
    }

    /// Set the environment every node of the chain runs in
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let env = TestEnv::docker_setup("TestHub").await?;
    /// let builder = ChainBuilder::new("TestHub", config).with_env(env);
    /// ```
    pub fn with_env(mut self, env: TestEnv) -> Self {
        self.env = Some(env);
        self
    }

    fn core(self) -> Result<ChainCore> {
        if self.validators == 0 {
            bail!("chain {} needs at least one validator", self.config.name);
        }
        if self.config.image().is_none() {
            bail!("chain {} has no image configured", self.config.name);
        }
        let env = self
            .env
            .ok_or_else(|| anyhow!("chain {} has no test environment", self.config.name))?;

        let config = Arc::new(self.config);
        let node = |index: usize, validator: bool| -> Result<Arc<Node>> {
            Ok(Arc::new(Node::new(
                config.clone(),
                env.clone(),
                &self.test_name,
                index,
                validator,
            )?))
        };
        let validators = (0..self.validators)
            .map(|i| node(i, true))
            .collect::<Result<Vec<_>>>()?;
        let full_nodes = (0..self.full_nodes)
            .map(|i| node(i, false))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "built chain {} with {} validators and {} full nodes",
            config.name,
            validators.len(),
            full_nodes.len()
        );
        ChainCore::new(config, env, &self.test_name, validators, full_nodes)
    }

    /// Build the chain with explicit flavor hooks
    ///
    /// # Errors
    ///
    /// Fails without validators, without an image or without an environment.
    pub fn build<F: FlavorHooks>(self, flavor: F) -> Result<Chain<F>> {
        Ok(Chain::new(self.core()?, flavor))
    }

    /// Build the chain with the flavor its chain type names
    pub fn build_any(self) -> Result<AnyChain> {
        let chain_type = self.config.chain_type;
        let chain = match chain_type {
            ChainType::Cosmos => AnyChain::Cosmos(Arc::new(self.build(CosmosFlavor)?)),
            ChainType::Hub(HubVendor::Dymension) => AnyChain::DymHub(Arc::new(self.build(DymHub::new())?)),
            ChainType::Hub(HubVendor::Celestia) => AnyChain::CelesHub(Arc::new(self.build(CelesHub::new())?)),
            ChainType::RollApp(RollAppVendor::Dymension) => {
                AnyChain::DymRollApp(Arc::new(self.build(DymRollApp::new())?))
            }
            ChainType::RollApp(RollAppVendor::Rollkit) => {
                AnyChain::GmRollApp(Arc::new(self.build(GmRollApp::new())?))
            }
        };
        Ok(chain)
    }
}

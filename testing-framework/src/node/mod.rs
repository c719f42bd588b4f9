// File: testing-framework/src/node/mod.rs
//
// Node
//
// One validator or full node of a chain. A node owns its home directory on
// the shared host volume, its keyring, its container and its RPC client, and
// exposes the chain binary's CLI as typed async operations.
//
// Split by concern:
// - keys.rs      keyring entries and bech32 lookups
// - genesis.rs   home init, genesis accounts, gentx, config files
// - tx.rs        transactions, queries, bank and governance helpers
// - container.rs node container lifecycle and the health gate
// - hub.rs       Dymension hub transactions and queries
// - da.rs        Celestia DA bridge and light node commands

mod container;
mod da;
mod genesis;
mod hub;
mod keys;
mod tx;

pub use da::{bridge_store, light_store, BridgeStart, LightNodeStart};
pub use hub::{RollAppRegistration, SequencerRegistration, VmType, QGB_EVM_ADDRESS};
pub use keys::{KeyEncoding, MNEMONIC_ENV};

use crate::docker::{ExecJob, ExecOutput};
use crate::orchestrator::TestEnv;
use crate::rpc::NodeRpc;
use crate::utilities::random_lowercase;
use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use rollup_e2e_common::config::{CONTAINER_HOME_ROOT, RPC_PORT_NUMBER};
use rollup_e2e_common::naming::{condense_hostname, condense_moniker, node_name};
use rollup_e2e_common::{ChainConfig, DockerImage, ExecError};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Host addresses the node's container ports are published on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPorts {
    pub rpc: String,
    pub grpc: String,
    pub api: String,
}

/// A chain participant running in its own container
pub struct Node {
    config: Arc<ChainConfig>,
    env: TestEnv,
    image: DockerImage,
    index: usize,
    validator: bool,
    test_name: String,
    name: String,
    hostname: String,

    // Serializes keyring and signing commands against the home directory.
    lock: Mutex<()>,
    container_id: RwLock<Option<String>>,
    client: RwLock<Option<Arc<dyn NodeRpc>>>,
    host_ports: RwLock<Option<HostPorts>>,
    genesis_subcommand: OnceCell<bool>,
}

impl Node {
    /// Creates the node; nothing touches the runtime until configuration
    pub fn new(
        config: Arc<ChainConfig>,
        env: TestEnv,
        test_name: &str,
        index: usize,
        validator: bool,
    ) -> Result<Self> {
        let image = config
            .image()
            .cloned()
            .ok_or_else(|| anyhow!("chain {} has no image configured", config.name))?;
        let name = node_name(
            config.chain_type,
            &config.chain_id,
            validator,
            index,
            test_name,
        );
        let hostname = condense_hostname(&name);
        Ok(Self {
            config,
            env,
            image,
            index,
            validator,
            test_name: test_name.to_string(),
            name,
            hostname,
            lock: Mutex::new(()),
            container_id: RwLock::new(None),
            client: RwLock::new(None),
            host_ports: RwLock::new(None),
            genesis_subcommand: OnceCell::new(),
        })
    }

    // ========================================================================
    // Identity
    // ========================================================================

    /// Container name, unique per chain, role, index and test
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn moniker(&self) -> String {
        condense_moniker(&self.name)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_validator(&self) -> bool {
        self.validator
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn chain_config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn env(&self) -> &TestEnv {
        &self.env
    }

    pub fn image(&self) -> &DockerImage {
        &self.image
    }

    /// Volume holding the home directory, relative to the host root
    pub fn volume(&self) -> &str {
        &self.name
    }

    /// Home directory as seen from inside containers
    pub fn home_dir(&self) -> String {
        format!("{}/{}", CONTAINER_HOME_ROOT, self.volume())
    }

    /// CometBFT RPC address reachable from other containers
    pub fn rpc_address(&self) -> String {
        format!("tcp://{}:{}", self.hostname, RPC_PORT_NUMBER)
    }

    // ========================================================================
    // Command builders
    // ========================================================================

    /// `[bin, args.., --home <home>]`
    pub fn bin_command(&self, args: &[&str]) -> Vec<String> {
        let mut command = Vec::with_capacity(args.len() + 3);
        command.push(self.config.bin.clone());
        command.extend(args.iter().map(|a| a.to_string()));
        command.push("--home".to_string());
        command.push(self.home_dir());
        command
    }

    /// [`bin_command`](Self::bin_command) pointed at this node's RPC
    pub fn node_command(&self, args: &[&str]) -> Vec<String> {
        let mut command = self.bin_command(args);
        command.push("--node".to_string());
        command.push(self.rpc_address());
        command
    }

    /// `query <args..> --output json` against this node
    pub fn query_command(&self, args: &[&str]) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 3);
        full.push("query");
        full.extend_from_slice(args);
        full.extend_from_slice(&["--output", "json"]);
        self.node_command(&full)
    }

    /// `tx <args..>` signed by `key`
    ///
    /// Gas price and adjustment from the chain config are added unless the
    /// caller already passed them.
    pub fn tx_command(&self, key: &str, args: &[&str]) -> Vec<String> {
        let gas_adjustment = self.config.gas_adjustment.to_string();
        let mut full = Vec::with_capacity(args.len() + 16);
        full.push("tx");
        full.extend_from_slice(args);
        if !args.contains(&"--gas-prices") {
            full.extend_from_slice(&["--gas-prices", self.config.gas_prices.as_str()]);
        }
        if !args.contains(&"--gas-adjustment") {
            full.extend_from_slice(&["--gas-adjustment", gas_adjustment.as_str()]);
        }
        full.extend_from_slice(&[
            "--from",
            key,
            "--keyring-backend",
            rollup_e2e_common::config::KEYRING_BACKEND,
            "--output",
            "json",
            "-y",
            "--chain-id",
            self.config.chain_id.as_str(),
        ]);
        self.node_command(&full)
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Runs `command` in a throwaway container sharing this node's volumes
    pub async fn exec(&self, command: Vec<String>, env: Vec<String>) -> Result<ExecOutput, ExecError> {
        self.exec_job(command, env, false).await
    }

    pub(crate) async fn exec_job(
        &self,
        command: Vec<String>,
        env: Vec<String>,
        detached: bool,
    ) -> Result<ExecOutput, ExecError> {
        let job = ExecJob {
            name: format!("{}-exec-{}", self.hostname, random_lowercase(6)),
            image: self.image.clone(),
            network_id: self.env.network_id.clone(),
            binds: self.env.binds(),
            env,
            command,
            detached,
        };
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("{} exec: {:?}", self.name, job.command);
        }
        self.env.executor.exec(&job).await
    }

    /// Runs the chain binary against this node's home
    pub async fn exec_bin(&self, args: &[&str]) -> Result<ExecOutput> {
        self.exec(self.bin_command(args), Vec::new())
            .await
            .with_context(|| format!("node {}: {} failed", self.name, args.join(" ")))
    }

    /// Whether the binary knows the given subcommand
    ///
    /// Probes `<sub> --help`. An "unknown command" error means no; an
    /// argument-count error means the command exists.
    pub async fn has_command(&self, sub: &[&str]) -> Result<bool> {
        let mut probe = sub.to_vec();
        probe.push("--help");
        match self.exec(self.bin_command(&probe), Vec::new()).await {
            Ok(_) => Ok(true),
            Err(e) if e.stderr().contains("Error: unknown command") => Ok(false),
            Err(e) if e.stderr().contains("Error: accepts") => Ok(true),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("node {}: probing for {:?}", self.name, sub))),
        }
    }

    /// Whether genesis commands live under the `genesis` subcommand
    pub async fn supports_genesis_subcommand(&self) -> Result<bool> {
        self.genesis_subcommand
            .get_or_try_init(|| self.has_command(&["genesis"]))
            .await
            .copied()
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Reads a file relative to the home directory
    pub async fn read_file(&self, rel_path: &str) -> Result<Vec<u8>> {
        self.env
            .files
            .read_file(self.volume(), rel_path)
            .await
            .with_context(|| format!("node {}: reading {}", self.name, rel_path))
    }

    /// Writes a file relative to the home directory
    pub async fn write_file(&self, rel_path: &str, content: &[u8]) -> Result<()> {
        self.env
            .files
            .write_file(self.volume(), rel_path, content)
            .await
            .with_context(|| format!("node {}: writing {}", self.name, rel_path))
    }

    // ========================================================================
    // RPC
    // ========================================================================

    /// RPC client, available once the container started
    pub fn client(&self) -> Result<Arc<dyn NodeRpc>> {
        self.client
            .read()
            .clone()
            .ok_or_else(|| anyhow!("node {} has no rpc client, container not started", self.name))
    }

    pub fn host_ports(&self) -> Option<HostPorts> {
        self.host_ports.read().clone()
    }

    pub async fn height(&self) -> Result<u64> {
        self.client()?
            .height()
            .await
            .with_context(|| format!("node {}: querying height", self.name))
    }

    /// Waits for `delta` new blocks
    pub async fn wait_for_blocks(&self, delta: u64) -> Result<u64> {
        let client = self.client()?;
        crate::waiters::wait_for_blocks(
            client.as_ref(),
            delta,
            &self.env.blocks,
            self.env.clock.as_ref(),
        )
        .await
        .with_context(|| format!("node {}: waiting for {} blocks", self.name, delta))
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

// File: testing-framework/src/orchestrator/mod.rs
//
// Test Environment
//
// A `TestEnv` bundles every external dependency a chain needs: the container
// runtime, the job executor, volume file access, RPC clients, a clock, the
// docker network and the host directory bind-mounted into containers. Chains
// and nodes only ever see the environment, which is what makes the lifecycle
// testable against fakes.

/// Clock abstractions for deterministic time control in tests
pub mod clock;

pub use clock::{Clock, PausedClock, SystemClock};

use crate::docker::{CommandExecutor, ContainerRuntime, DockerCli, FileBridge, HostVolumeBridge};
use crate::rpc::{HttpRpcConnector, RpcConnector};
use anyhow::{Context, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rollup_e2e_common::config::{CELESTIA_HOME_ROOT, CELESTIA_HOST_DIR, CONTAINER_HOME_ROOT};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Back-off applied after a node container starts
///
/// The node is considered healthy once its RPC answers and reports it is no
/// longer catching up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthCheckPolicy {
    /// Wait before the first probe
    pub initial_delay: Duration,
    /// Probes before giving up
    pub attempts: u32,
    /// Wait between probes
    pub interval: Duration,
}

impl Default for HealthCheckPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            attempts: 40,
            interval: Duration::from_secs(3),
        }
    }
}

/// Polling used when waiting for a number of new blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockWaitPolicy {
    pub poll_interval: Duration,
    /// Upper bound for a single wait, however many blocks it asks for
    pub timeout: Duration,
}

impl Default for BlockWaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(120),
        }
    }
}

/// External dependencies shared by every chain of a test
///
/// # Example
///
/// ```rust,ignore
/// let env = TestEnv::docker_setup("TestHubRollappIBC").await?;
/// let hub = ChainBuilder::new("TestHubRollappIBC", hub_config)
///     .with_env(env.clone())
///     .with_validators(1)
///     .build_any()?;
/// ```
#[derive(Clone)]
pub struct TestEnv {
    pub runtime: Arc<dyn ContainerRuntime>,
    pub executor: Arc<dyn CommandExecutor>,
    pub files: Arc<dyn FileBridge>,
    pub rpc: Arc<dyn RpcConnector>,
    pub clock: Arc<dyn Clock>,
    /// Docker network every container joins
    pub network_id: String,
    /// Host directory mounted at the container home root
    pub host_root: PathBuf,
    pub health: HealthCheckPolicy,
    pub blocks: BlockWaitPolicy,
    // Keeps a harness-created host directory alive as long as any clone.
    _host_dir: Option<Arc<TempDir>>,
}

impl TestEnv {
    /// Environment from explicit parts, with default policies and the system clock
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        executor: Arc<dyn CommandExecutor>,
        files: Arc<dyn FileBridge>,
        rpc: Arc<dyn RpcConnector>,
        network_id: impl Into<String>,
        host_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runtime,
            executor,
            files,
            rpc,
            clock: Arc::new(SystemClock),
            network_id: network_id.into(),
            host_root: host_root.into(),
            health: HealthCheckPolicy::default(),
            blocks: BlockWaitPolicy::default(),
            _host_dir: None,
        }
    }

    /// Real Docker environment on an existing network and host directory
    pub fn docker(network_id: impl Into<String>, host_root: impl Into<PathBuf>) -> Self {
        let host_root = host_root.into();
        let docker = Arc::new(DockerCli::new());
        Self::new(
            docker.clone(),
            docker,
            Arc::new(HostVolumeBridge::new(host_root.clone())),
            Arc::new(HttpRpcConnector),
            network_id,
            host_root,
        )
    }

    /// Creates a fresh network and a temporary host directory for one test
    pub async fn docker_setup(test_name: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("rollup-e2e-")
            .tempdir()
            .context("creating host directory for node homes")?;
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect();
        let network_name = format!(
            "{}-{}",
            rollup_e2e_common::naming::sanitize_container_name(test_name).to_lowercase(),
            suffix
        );
        let network_id = DockerCli::new()
            .create_network(&network_name)
            .await
            .with_context(|| format!("creating docker network {}", network_name))?;
        log::info!(
            "test {} uses network {} and host dir {}",
            test_name,
            network_name,
            dir.path().display()
        );

        let mut env = Self::docker(network_id, dir.path());
        env._host_dir = Some(Arc::new(dir));
        Ok(env)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_health_policy(mut self, policy: HealthCheckPolicy) -> Self {
        self.health = policy;
        self
    }

    pub fn with_block_wait_policy(mut self, policy: BlockWaitPolicy) -> Self {
        self.blocks = policy;
        self
    }

    pub fn host_root(&self) -> &Path {
        &self.host_root
    }

    /// Bind mounts given to node containers and jobs
    pub fn binds(&self) -> Vec<String> {
        vec![
            format!("{}:{}", self.host_root.display(), CONTAINER_HOME_ROOT),
            format!(
                "{}:{}",
                self.host_root.join(CELESTIA_HOST_DIR).display(),
                CELESTIA_HOME_ROOT
            ),
        ]
    }
}

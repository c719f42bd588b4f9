// File: testing-framework/src/docker/mod.rs
//
// Container Runtime Seams
//
// Nodes never talk to Docker directly. They go through three traits:
// - `ContainerRuntime` for the long-running node containers
// - `CommandExecutor` for one-shot jobs that run the chain binary against a
//   node's home directory
// - `FileBridge` for reading and writing files inside a node's volume
//
// `DockerCli` and `HostVolumeBridge` are the real implementations; harness
// tests swap in fakes.

mod cli;
mod volume;

pub use cli::DockerCli;
pub use volume::HostVolumeBridge;

use anyhow::Result;
use async_trait::async_trait;
use rollup_e2e_common::{DockerImage, ExecError};

/// Everything needed to create a node container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub hostname: String,
    pub network_id: String,
    pub image: DockerImage,
    /// `<port>/tcp` entries published on random host ports
    pub ports: Vec<String>,
    /// `host_path:container_path` bind mounts
    pub binds: Vec<String>,
    pub env: Vec<String>,
    pub command: Vec<String>,
    pub labels: Vec<(String, String)>,
}

/// Long-running container lifecycle
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Creates (without starting) a container and returns its id
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String>;

    async fn start_container(&self, id: &str) -> Result<()>;

    /// Host address (`ip:port`) each container port is published on
    async fn host_ports(&self, id: &str, ports: &[&str]) -> Result<Vec<String>>;

    async fn stop_container(&self, id: &str) -> Result<()>;

    async fn remove_container(&self, id: &str) -> Result<()>;
}

/// A one-shot command run in a throwaway container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecJob {
    /// Container name of the job, unique per invocation
    pub name: String,
    pub image: DockerImage,
    pub network_id: String,
    pub binds: Vec<String>,
    pub env: Vec<String>,
    pub command: Vec<String>,
    /// Leave the process running in the background instead of waiting for it
    pub detached: bool,
}

/// Captured output of a finished job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecOutput {
    /// Stdout as text with surrounding whitespace removed
    pub fn stdout_trimmed(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }
}

/// Runs one-shot jobs and reports a non-zero exit as [`ExecError`]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn exec(&self, job: &ExecJob) -> Result<ExecOutput, ExecError>;
}

/// File access inside named volumes
///
/// A volume is the directory a node (or helper process) keeps its home in;
/// paths are relative to the volume root.
#[async_trait]
pub trait FileBridge: Send + Sync {
    async fn write_file(&self, volume: &str, rel_path: &str, content: &[u8]) -> Result<()>;

    async fn read_file(&self, volume: &str, rel_path: &str) -> Result<Vec<u8>>;

    /// Recursively copies a directory between (or within) volumes
    async fn copy_dir(
        &self,
        src_volume: &str,
        src_rel: &str,
        dst_volume: &str,
        dst_rel: &str,
    ) -> Result<()>;
}

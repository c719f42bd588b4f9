// File: testing-framework/src/docker/cli.rs
//
// Docker CLI backend
//
// Drives the local Docker daemon through the `docker` binary. Every call is a
// separate process so nothing here keeps connection state.

use super::{CommandExecutor, ContainerRuntime, ContainerSpec, ExecJob, ExecOutput};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rollup_e2e_common::ExecError;
use std::process::Output;
use tokio::process::Command;

/// Label put on everything the harness creates, used by cleanup
pub const HARNESS_LABEL: &str = "rollup-e2e-testing";

/// Container runtime and job executor backed by the `docker` CLI
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }

    /// Uses another docker-compatible binary (e.g. `podman`)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<Output> {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{} {}", self.program, args.join(" "));
        }
        Command::new(&self.program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to run {} {}", self.program, first(args)))
    }

    async fn run_checked(&self, args: &[String]) -> Result<String> {
        let output = self.run(args).await?;
        if !output.status.success() {
            bail!(
                "{} {} failed: {}",
                self.program,
                first(args),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Creates a bridge network for one test and returns its id
    pub async fn create_network(&self, name: &str) -> Result<String> {
        self.run_checked(&[
            "network".to_string(),
            "create".to_string(),
            "--label".to_string(),
            HARNESS_LABEL.to_string(),
            name.to_string(),
        ])
        .await
    }

    pub async fn remove_network(&self, id: &str) -> Result<()> {
        self.run_checked(&["network".to_string(), "rm".to_string(), id.to_string()])
            .await
            .map(|_| ())
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

fn first(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or_default()
}

fn user_args(uid_gid: &str) -> Vec<String> {
    if uid_gid.is_empty() {
        Vec::new()
    } else {
        vec!["--user".to_string(), uid_gid.to_string()]
    }
}

/// Arguments of `docker create` for a node container
pub(crate) fn create_args(spec: &ContainerSpec) -> Vec<String> {
    let mut args = vec![
        "create".to_string(),
        "--name".to_string(),
        spec.name.clone(),
        "--hostname".to_string(),
        spec.hostname.clone(),
        "--network".to_string(),
        spec.network_id.clone(),
        "--label".to_string(),
        HARNESS_LABEL.to_string(),
    ];
    args.extend(user_args(&spec.image.uid_gid));
    for (key, value) in &spec.labels {
        args.push("--label".to_string());
        args.push(format!("{}={}", key, value));
    }
    for port in &spec.ports {
        // Empty host part lets the daemon pick a free port.
        args.push("--publish".to_string());
        args.push(format!("127.0.0.1::{}", port));
    }
    for bind in &spec.binds {
        args.push("--volume".to_string());
        args.push(bind.clone());
    }
    for env in &spec.env {
        args.push("--env".to_string());
        args.push(env.clone());
    }
    args.push(spec.image.reference());
    args.extend(spec.command.iter().cloned());
    args
}

/// Arguments of `docker run` for a one-shot job
pub(crate) fn run_args(job: &ExecJob) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        if job.detached { "--detach" } else { "--rm" }.to_string(),
        "--name".to_string(),
        job.name.clone(),
        "--network".to_string(),
        job.network_id.clone(),
        "--label".to_string(),
        HARNESS_LABEL.to_string(),
    ];
    args.extend(user_args(&job.image.uid_gid));
    for bind in &job.binds {
        args.push("--volume".to_string());
        args.push(bind.clone());
    }
    for env in &job.env {
        args.push("--env".to_string());
        args.push(env.clone());
    }
    args.push(job.image.reference());
    args.extend(job.command.iter().cloned());
    args
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String> {
        self.run_checked(&create_args(spec))
            .await
            .with_context(|| format!("creating container {}", spec.name))
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.run_checked(&["start".to_string(), id.to_string()])
            .await
            .map(|_| ())
    }

    async fn host_ports(&self, id: &str, ports: &[&str]) -> Result<Vec<String>> {
        let mut out = Vec::with_capacity(ports.len());
        for port in ports {
            let format = format!(
                "{{{{(index (index .NetworkSettings.Ports \"{}\") 0).HostIp}}}}:{{{{(index (index .NetworkSettings.Ports \"{}\") 0).HostPort}}}}",
                port, port
            );
            let addr = self
                .run_checked(&[
                    "inspect".to_string(),
                    "--format".to_string(),
                    format,
                    id.to_string(),
                ])
                .await
                .with_context(|| format!("resolving host port of {} on {}", port, id))?;
            out.push(addr);
        }
        Ok(out)
    }

    async fn stop_container(&self, id: &str) -> Result<()> {
        self.run_checked(&[
            "stop".to_string(),
            "--time".to_string(),
            "30".to_string(),
            id.to_string(),
        ])
        .await
        .map(|_| ())
    }

    async fn remove_container(&self, id: &str) -> Result<()> {
        self.run_checked(&[
            "rm".to_string(),
            "--force".to_string(),
            "--volumes".to_string(),
            id.to_string(),
        ])
        .await
        .map(|_| ())
    }
}

#[async_trait]
impl CommandExecutor for DockerCli {
    async fn exec(&self, job: &ExecJob) -> Result<ExecOutput, ExecError> {
        let args = run_args(job);
        let output = self.run(&args).await.map_err(|e| ExecError::Spawn {
            command: job.command.clone(),
            source: std::io::Error::other(format!("{:#}", e)),
        })?;
        if !output.status.success() {
            return Err(ExecError::NonZeroExit {
                command: job.command.clone(),
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(ExecOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollup_e2e_common::DockerImage;

    fn image() -> DockerImage {
        DockerImage {
            repository: "ghcr.io/decentrio/dymension".to_string(),
            version: "debug".to_string(),
            uid_gid: "1025:1025".to_string(),
        }
    }

    #[test]
    fn test_create_args_publish_every_port() {
        let spec = ContainerSpec {
            name: "hub-val-0-TestX".to_string(),
            hostname: "hub-val-0-TestX".to_string(),
            network_id: "net1".to_string(),
            image: image(),
            ports: vec!["26657/tcp".to_string(), "9090/tcp".to_string()],
            binds: vec!["/tmp/x:/var/cosmos-chain".to_string()],
            env: Vec::new(),
            command: vec!["dymd".to_string(), "start".to_string()],
            labels: vec![("chain".to_string(), "hub".to_string())],
        };
        let args = create_args(&spec);

        assert_eq!(args[0], "create");
        assert!(args.windows(2).any(|w| w == ["--user", "1025:1025"]));
        assert!(args.windows(2).any(|w| w == ["--publish", "127.0.0.1::26657/tcp"]));
        assert!(args.windows(2).any(|w| w == ["--publish", "127.0.0.1::9090/tcp"]));
        assert!(args.windows(2).any(|w| w == ["--label", "chain=hub"]));
        // Image comes right before the command.
        let image_pos = args.iter().position(|a| a == "ghcr.io/decentrio/dymension:debug").unwrap();
        assert_eq!(&args[image_pos + 1..], ["dymd", "start"]);
    }

    #[test]
    fn test_run_args_detached_jobs_are_kept() {
        let mut job = ExecJob {
            name: "job".to_string(),
            image: DockerImage::new("celestia", "v1"),
            network_id: "net1".to_string(),
            binds: Vec::new(),
            env: vec!["CELESTIA_CUSTOM=test:ABC".to_string()],
            command: vec!["celestia".to_string(), "version".to_string()],
            detached: false,
        };
        assert_eq!(run_args(&job)[1], "--rm");
        assert!(!run_args(&job).contains(&"--user".to_string()));

        job.detached = true;
        let args = run_args(&job);
        assert_eq!(args[1], "--detach");
        assert!(args.windows(2).any(|w| w == ["--env", "CELESTIA_CUSTOM=test:ABC"]));
    }
}

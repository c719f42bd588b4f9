// File: testing-framework/src/node/container.rs
//
// Node container lifecycle and the post-start health gate.

use super::{HostPorts, Node};
use crate::docker::ContainerSpec;
use crate::utilities::retry_fixed;
use anyhow::{anyhow, bail, Context, Result};
use rollup_e2e_common::config::{API_PORT, EXPOSED_PORTS, GRPC_PORT, RPC_PORT};

impl Node {
    /// Default container command: `<bin> start --home <home>`
    ///
    /// With `no_host_mount` the home is copied inside the container first so
    /// the chain never writes to the bind mount.
    pub fn start_command(&self) -> Vec<String> {
        let home = self.home_dir();
        if self.config.no_host_mount {
            let script = format!(
                "cp -r {home} {home}_nomnt && {bin} start --home {home}_nomnt --x-crisis-skip-assert-invariants",
                home = home,
                bin = self.config.bin
            );
            return vec!["sh".to_string(), "-c".to_string(), script];
        }
        vec![
            self.config.bin.clone(),
            "start".to_string(),
            "--home".to_string(),
            home,
            "--x-crisis-skip-assert-invariants".to_string(),
        ]
    }

    /// Creates (but does not start) the node container running `command`
    pub async fn create_node_container(&self, command: Vec<String>) -> Result<()> {
        let spec = ContainerSpec {
            name: self.name.clone(),
            hostname: self.hostname.clone(),
            network_id: self.env.network_id.clone(),
            image: self.image.clone(),
            ports: EXPOSED_PORTS.iter().map(|p| p.to_string()).collect(),
            binds: self.env.binds(),
            env: Vec::new(),
            command,
            labels: vec![
                ("rollup-e2e.chain".to_string(), self.config.chain_id.clone()),
                ("rollup-e2e.test".to_string(), self.test_name.clone()),
            ],
        };
        let id = self
            .env
            .runtime
            .create_container(&spec)
            .await
            .with_context(|| format!("node {}: creating container", self.name))?;
        *self.container_id.write() = Some(id);
        Ok(())
    }

    pub fn container_id(&self) -> Option<String> {
        self.container_id.read().clone()
    }

    fn require_container(&self) -> Result<String> {
        self.container_id()
            .ok_or_else(|| anyhow!("node {} has no container", self.name))
    }

    /// Starts the container and waits until the node has caught up
    ///
    /// After the policy's initial delay the node's status is polled at a
    /// fixed interval; a node still catching up, or not answering, counts as
    /// a failed attempt. The RPC client is only published once the node is
    /// healthy.
    pub async fn start_container(&self) -> Result<()> {
        let id = self.require_container()?;
        log::info!("Starting container {} ({})", self.name, id);
        self.env
            .runtime
            .start_container(&id)
            .await
            .with_context(|| format!("node {}: starting container", self.name))?;

        let ports = self
            .env
            .runtime
            .host_ports(&id, &[RPC_PORT, GRPC_PORT, API_PORT])
            .await
            .with_context(|| format!("node {}: resolving host ports", self.name))?;
        let [rpc, grpc, api]: [String; 3] = ports
            .try_into()
            .map_err(|p: Vec<String>| anyhow!("expected 3 host ports, got {}", p.len()))?;
        let client = self.env.rpc.connect(&rpc)?;
        *self.host_ports.write() = Some(HostPorts { rpc, grpc, api });

        let policy = self.env.health;
        let clock = self.env.clock.as_ref();
        clock.sleep(policy.initial_delay).await;
        retry_fixed(clock, policy.attempts, policy.interval, |attempt| {
            let client = client.clone();
            let name = self.name.as_str();
            async move {
                let status = client.status().await?;
                if status.catching_up {
                    log::debug!(
                        "{} still catching up at height {} (attempt {})",
                        name,
                        status.latest_block_height,
                        attempt
                    );
                    bail!(
                        "still catching up: height({}) catching-up({})",
                        status.latest_block_height,
                        status.catching_up
                    );
                }
                Ok(())
            }
        })
        .await
        .with_context(|| format!("node {}: health check failed", self.name))?;

        *self.client.write() = Some(client);
        Ok(())
    }

    pub async fn stop_container(&self) -> Result<()> {
        let id = self.require_container()?;
        self.env
            .runtime
            .stop_container(&id)
            .await
            .with_context(|| format!("node {}: stopping container", self.name))
    }

    /// Removes the container; the RPC client is dropped with it
    pub async fn remove_container(&self) -> Result<()> {
        let id = self.require_container()?;
        self.env
            .runtime
            .remove_container(&id)
            .await
            .with_context(|| format!("node {}: removing container", self.name))?;
        *self.container_id.write() = None;
        *self.client.write() = None;
        Ok(())
    }
}

// File: testing-framework/src/node_set.rs
//
// Node Sets
//
// The nodes of one chain and the fan-out used to run the same step on all of
// them at once. A batch fails as soon as any node fails; nodes whose step is
// still running are left to finish on their own.

use crate::node::Node;
use anyhow::{anyhow, Context, Result};
use futures::future::try_join_all;
use rollup_e2e_common::config::P2P_PORT_NUMBER;
use std::future::Future;
use std::sync::Arc;

/// Runs `step` concurrently for every node, in the nodes' order
///
/// Each node's step is spawned on the runtime, so steps make progress even
/// while the caller awaits another one. The first error is returned; results
/// keep the order of `nodes`.
///
/// # Example
///
/// ```rust,ignore
/// run_batch(chain.nodes(), |node| async move { node.init_full_node_files().await }).await?;
/// ```
pub async fn run_batch<T, F, Fut>(nodes: &[Arc<Node>], step: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(Arc<Node>) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let handles = nodes.iter().map(|node| {
        let name = node.name().to_string();
        let task = tokio::spawn(step(node.clone()));
        async move {
            task.await
                .map_err(|e| anyhow!("node {} task aborted: {}", name, e))?
        }
    });
    try_join_all(handles).await
}

/// Ordered nodes of a chain
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: Vec<Arc<Node>>,
}

impl NodeSet {
    pub fn new(nodes: Vec<Arc<Node>>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Comma separated `<node_id>@<hostname>:26656` for every node
    ///
    /// The string is all or nothing: a node whose identity cannot be read
    /// fails the whole call instead of being left out.
    pub async fn peer_string(&self) -> Result<String> {
        let ids = run_batch(&self.nodes, |node| async move {
            let id = node
                .node_id()
                .await
                .with_context(|| format!("peer string: node {}", node.name()))?;
            Ok(format!("{}@{}:{}", id, node.hostname(), P2P_PORT_NUMBER))
        })
        .await?;
        Ok(ids.join(","))
    }

    /// Logs each node's genesis hash, which must be the same everywhere
    pub async fn log_genesis_hashes(&self) -> Result<()> {
        for node in &self.nodes {
            let hash = node.genesis_hash().await?;
            log::info!("{} genesis hash {}", node.name(), hash);
        }
        Ok(())
    }
}

impl From<Vec<Arc<Node>>> for NodeSet {
    fn from(nodes: Vec<Arc<Node>>) -> Self {
        Self::new(nodes)
    }
}

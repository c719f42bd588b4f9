// File: testing-framework/src/waiters.rs
//
// Waiter Primitives
//
// Poll-until-true helpers for chain progress. Every wait is bounded by a
// timeout and sleeps through the injected `Clock`, so tests never rely on
// fixed sleeps and harness tests can run them under paused time.

use crate::orchestrator::{BlockWaitPolicy, Clock};
use crate::rpc::NodeRpc;
use anyhow::{anyhow, Result};
use rollup_e2e_common::WaitTimeoutError;
use std::future::Future;
use tokio::time::{timeout, Duration};

/// Waits until `node` reports a height of at least `height`
///
/// # Example
///
/// ```ignore
/// wait_for_height(client.as_ref(), 100, &policy, clock.as_ref()).await?;
/// ```
pub async fn wait_for_height<N: NodeRpc + ?Sized>(
    node: &N,
    height: u64,
    policy: &BlockWaitPolicy,
    clock: &dyn Clock,
) -> Result<u64> {
    timeout(policy.timeout, async {
        loop {
            let current = node.height().await?;
            if current >= height {
                return Ok(current);
            }
            clock.sleep(policy.poll_interval).await;
        }
    })
    .await
    .map_err(|_| {
        anyhow!(
            "Timeout waiting for block height {} after {:?}",
            height,
            policy.timeout
        )
    })?
}

/// Waits for `delta` blocks past the node's current height
///
/// Returns the height that satisfied the wait.
pub async fn wait_for_blocks<N: NodeRpc + ?Sized>(
    node: &N,
    delta: u64,
    policy: &BlockWaitPolicy,
    clock: &dyn Clock,
) -> Result<u64> {
    let start = node.height().await?;
    wait_for_height(node, start.saturating_add(delta), policy, clock).await
}

/// Polls `check` every `interval` until it yields a value
///
/// `check` returning `Ok(None)` means "not yet"; errors abort the wait.
/// Runs out with a [`WaitTimeoutError`] describing `what`.
///
/// # Example
///
/// ```
/// # tokio_test::block_on(async {
/// use rollup_e2e_testing::waiters::poll_until;
/// use rollup_e2e_testing::SystemClock;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// let counter = AtomicU32::new(0);
/// let calls = &counter;
/// let value = poll_until(
///     "third call",
///     Duration::from_millis(1),
///     Duration::from_secs(5),
///     &SystemClock,
///     || async move {
///         Ok::<_, anyhow::Error>((calls.fetch_add(1, Ordering::SeqCst) == 2).then_some(42))
///     },
/// )
/// .await
/// .unwrap();
/// assert_eq!(value, 42);
/// # });
/// ```
pub async fn poll_until<T, F, Fut>(
    what: impl Into<String>,
    interval: Duration,
    limit: Duration,
    clock: &dyn Clock,
    mut check: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let result = timeout(limit, async {
        loop {
            if let Some(value) = check().await? {
                return Ok(value);
            }
            clock.sleep(interval).await;
        }
    })
    .await;

    match result {
        Ok(inner) => inner,
        Err(_) => Err(WaitTimeoutError {
            what: what.into(),
            timeout: limit,
        }
        .into()),
    }
}

// File: testing-framework/src/utilities/retry.rs

use crate::orchestrator::Clock;
use anyhow::{anyhow, Result};
use std::future::Future;
use std::time::Duration;

/// Runs `op` up to `attempts` times, sleeping `delay` between failures
///
/// `op` receives the 1-based attempt number. The last error is returned,
/// annotated with the attempt count, once the budget is spent.
///
/// # Example
///
/// ```rust,ignore
/// let status = retry_fixed(env.clock.as_ref(), 40, Duration::from_secs(3), |_| async {
///     client.status().await
/// })
/// .await?;
/// ```
pub async fn retry_fixed<T, F, Fut>(
    clock: &dyn Clock,
    attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;
    for attempt in 1..=attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!("attempt {}/{} failed: {:#}", attempt, attempts, e);
                }
                last_error = Some(e);
                if attempt < attempts {
                    clock.sleep(delay).await;
                }
            }
        }
    }
    let error = last_error.unwrap_or_else(|| anyhow!("retry budget of zero attempts"));
    Err(error.context(format!("gave up after {} attempts", attempts)))
}

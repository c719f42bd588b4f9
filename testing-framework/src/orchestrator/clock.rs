// File: testing-framework/src/orchestrator/clock.rs
//
// Clock Abstraction
//
// Every wait in the harness (health-check back-off, block polling, hub state
// polling) sleeps through this trait so the retry and timeout logic can be
// exercised under paused tokio time without real chains.

use std::future::Future;
use std::pin::Pin;
use tokio::time::{self, Duration, Instant};

/// Time source used by nodes, chains and waiters
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use tokio::time::Duration;
/// use rollup_e2e_testing::orchestrator::clock::{Clock, SystemClock};
///
/// #[tokio::main]
/// async fn main() {
///     let clock: Arc<dyn Clock> = Arc::new(SystemClock);
///     let start = clock.now();
///     clock.sleep(Duration::from_millis(10)).await;
///     assert!(clock.now() - start >= Duration::from_millis(10));
/// }
/// ```
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Sleeps for `d`
    ///
    /// Under a paused runtime the sleep resolves as soon as tokio
    /// auto-advances or `PausedClock::advance` moves past the deadline.
    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Wall-clock time, used against real containers
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        time::Instant::now()
    }

    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(time::sleep(d))
    }
}

/// Paused tokio time, used by harness tests
///
/// `new()` pauses the runtime, so create it from a plain `#[tokio::test]`.
/// Under `#[tokio::test(start_paused = true)]` time is already frozen and
/// [`SystemClock`] behaves the same way: sleeps elapse instantly once every
/// task is idle, which is how the health-check back-off is tested.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_timeout_window() {
///     let clock = Arc::new(PausedClock::new());
///     clock.advance(Duration::from_secs(30)).await;
/// }
/// ```
pub struct PausedClock;

impl PausedClock {
    /// Creates the clock and pauses tokio time
    pub fn new() -> Self {
        time::pause();
        Self
    }

    /// Moves paused time forward, waking every sleep that expires on the way
    pub async fn advance(&self, d: Duration) {
        time::advance(d).await
    }
}

impl Clock for PausedClock {
    fn now(&self) -> Instant {
        time::Instant::now()
    }

    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(time::sleep(d))
    }
}

impl Default for PausedClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_paused_clock_advancement() {
        let clock = Arc::new(PausedClock::new());
        let start = clock.now();

        clock.advance(Duration::from_secs(1)).await;
        assert_eq!(clock.now() - start, Duration::from_secs(1));

        clock.advance(Duration::from_secs(2)).await;
        assert_eq!(clock.now() - start, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_paused_sleep_auto_advances() {
        let clock = Arc::new(PausedClock::new());
        let start = clock.now();

        // Nothing else runs, so the runtime jumps straight to the deadline.
        clock.sleep(Duration::from_secs(120)).await;

        assert_eq!(clock.now() - start, Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_sleeps_wake_in_order() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let short = {
            let clock = clock.clone();
            tokio::spawn(async move {
                clock.sleep(Duration::from_secs(3)).await;
                clock.now()
            })
        };
        let long = {
            let clock = clock.clone();
            tokio::spawn(async move {
                clock.sleep(Duration::from_secs(5)).await;
                clock.now()
            })
        };

        let short_done = short.await.unwrap();
        let long_done = long.await.unwrap();
        assert!(short_done < long_done);
    }

    #[tokio::test]
    async fn test_system_clock() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let start = clock.now();

        clock.sleep(Duration::from_millis(10)).await;

        assert!(clock.now() - start >= Duration::from_millis(10));
    }
}

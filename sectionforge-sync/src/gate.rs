//! Call pacing and read retries.

use crate::error::{SyncError, SyncResult};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Serializes external calls and spaces them by a minimum interval.
///
/// The lock is held for the whole call, so two callers sharing a gate never
/// overlap even when run from different tasks.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// A gate that serializes calls without delaying them.
    pub fn unthrottled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Runs `call` once the minimum interval since the previous call has
    /// elapsed.
    pub async fn run<F, Fut, T>(&self, call: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        let output = call().await;
        *last = Some(Instant::now());
        output
    }
}

/// Bounded retry with linear backoff. Applied to reads only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

impl RetryPolicy {
    /// Zero attempts is treated as one.
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay before attempt `attempt + 1`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }

    /// Runs `read` through `gate`, retrying retryable failures.
    ///
    /// A rate-limit answer waits for the server's `Retry-After` instead of
    /// the linear backoff. Non-retryable errors are returned as they are;
    /// running out of attempts yields [`SyncError::ReadExhausted`].
    pub async fn read<F, Fut, T>(&self, gate: &RateGate, what: &str, mut read: F) -> SyncResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SyncResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match gate.run(&mut read).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= self.attempts => {
                    return Err(SyncError::ReadExhausted {
                        what: what.to_string(),
                        attempts: attempt,
                        last: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = e.retry_after().unwrap_or_else(|| self.delay_after(attempt));
                    warn!("{} failed (attempt {}/{}): {}", what, attempt, self.attempts, e);
                    debug!("Retrying {} in {:?}", what, delay);
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

// File: latchbot-core/src/repositories/store_guard.rs

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::warn;
use crate::Error;

/// Bounds every store call with a timeout and retries transient failures a fixed number of times.
#[derive(Debug, Clone)]
pub struct StoreGuard {
    timeout: Duration,
    retries: u32,
    backoff: Duration,
}

impl StoreGuard {
    pub fn new(timeout: Duration, retries: u32) -> Self {
        Self {
            timeout,
            retries,
            backoff: Duration::from_millis(50),
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Runs `op` until it succeeds, fails permanently, or the retry budget is spent.
    /// `op` is called once per attempt, so it must build a fresh future each time.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let result = match timeout(self.timeout, op()).await {
                Ok(inner) => inner,
                Err(elapsed) => Err(Error::Timeout(elapsed)),
            };

            match result {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "{} failed ({}); retry {}/{}",
                        what, e, attempt, self.retries
                    );
                    sleep(self.backoff * attempt).await;
                }
                other => return other,
            }
        }
    }
}

impl Default for StoreGuard {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 2)
    }
}

//! Admission control for tool invocations

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Bounds how many invocations run at once against the device.
///
/// Calls beyond `max_concurrency` wait for a permit instead of failing.
#[derive(Debug, Clone)]
pub struct GovernanceConfig {
    /// Maximum concurrent executions
    pub max_concurrency: usize,
    /// Per-invocation timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    concurrency_limiter: Arc<Semaphore>,
}

impl GovernanceConfig {
    pub fn new(max_concurrency: usize, timeout_secs: Option<u64>) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            max_concurrency,
            timeout: timeout_secs.map(Duration::from_secs),
            concurrency_limiter: Arc::new(Semaphore::new(max_concurrency)),
        }
    }

    /// Wait for an execution slot
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.concurrency_limiter).acquire_owned().await.ok()
    }

    pub fn available_permits(&self) -> usize {
        self.concurrency_limiter.available_permits()
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY, None)
    }
}

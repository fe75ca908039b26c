//! Configuration types shared by the orchestrator, sources, and middleware.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounded exponential backoff for retrying upstream fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Total attempts including the first one (>= 1).
    pub max_attempts: u32,
    /// Delay before the second attempt in milliseconds.
    pub min_backoff_ms: u64,
    /// Upper bound for any single delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor applied after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff_ms: 1_500,
            max_backoff_ms: 30_000,
            factor: 2,
            jitter_percent: 10,
        }
    }
}

impl BackoffConfig {
    /// Base delay (before jitter) to wait after the failed attempt `attempt` (0-based).
    ///
    /// `min_backoff_ms * factor^attempt`, capped at `max_backoff_ms`.
    #[must_use]
    pub fn base_delay_ms(&self, attempt: u32) -> u64 {
        let factor = u64::from(self.factor.max(1));
        let mut delay = self.min_backoff_ms;
        for _ in 0..attempt {
            delay = delay.saturating_mul(factor);
            if delay >= self.max_backoff_ms {
                return self.max_backoff_ms;
            }
        }
        delay.min(self.max_backoff_ms)
    }

    /// Configuration with no waiting between attempts; handy in tests.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_backoff_ms: 0,
            max_backoff_ms: 0,
            factor: 1,
            jitter_percent: 0,
        }
    }
}

/// Global configuration for the `Watcher` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Directory holding one `{id}.json` record per commodity.
    pub data_dir: PathBuf,
    /// Number of most recent observations kept per commodity.
    pub retention: usize,
    /// Timeout for a single upstream fetch attempt.
    pub source_timeout: Duration,
    /// Maximum number of commodities updated concurrently.
    pub concurrency: usize,
    /// Retry policy applied to every registered source.
    pub backoff: BackoffConfig,
}

/// Default retention window, in observations.
pub const DEFAULT_RETENTION: usize = 1000;

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            retention: DEFAULT_RETENTION,
            source_timeout: Duration::from_secs(15),
            concurrency: 4,
            backoff: BackoffConfig::default(),
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use benchwatch_core::{
    BackoffConfig, BenchError, PriceSource, RawObservation, SourceKind, SourceParams,
};
use rand::Rng;

/// `base_ms` plus a uniform random extra of up to `jitter_percent` of it.
fn jitter_wait(base_ms: u64, jitter_percent: u8) -> u64 {
    if base_ms == 0 || jitter_percent == 0 {
        return base_ms;
    }
    let range = std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100);
    base_ms + rand::rng().random_range(0..range)
}

/// Wraps a source with a per-attempt timeout and bounded retries.
///
/// Each attempt runs under `tokio::time::timeout`. Transport failures and
/// timeouts are retried after `min(min_backoff * factor^n, max_backoff)` plus
/// jitter; other errors (missing key, no data, bad params) return at once.
/// When every attempt fails the caller gets [`BenchError::RetriesExhausted`]
/// carrying the last error.
pub struct RetryMiddleware {
    inner: Arc<dyn PriceSource>,
    backoff: BackoffConfig,
    attempt_timeout: Duration,
}

impl RetryMiddleware {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn PriceSource>, backoff: BackoffConfig, attempt_timeout: Duration) -> Self {
        Self {
            inner,
            backoff,
            attempt_timeout,
        }
    }

    /// Attempts made per fetch; never zero.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.backoff.max_attempts.max(1)
    }
}

#[async_trait]
impl PriceSource for RetryMiddleware {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn kind(&self) -> SourceKind {
        self.inner.kind()
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        let attempts = self.max_attempts();
        let name = self.inner.name();
        let mut last = BenchError::source_timeout(name);

        for attempt in 0..attempts {
            let result = tokio::time::timeout(self.attempt_timeout, self.inner.fetch(params)).await;
            match result {
                Ok(Ok(rows)) => return Ok(rows),
                Ok(Err(e)) if !e.is_retryable() => return Err(e),
                Ok(Err(e)) => last = e,
                Err(_) => last = BenchError::source_timeout(name),
            }

            if attempt + 1 < attempts {
                let wait = jitter_wait(
                    self.backoff.base_delay_ms(attempt),
                    self.backoff.jitter_percent,
                );
                tracing::warn!(
                    source = name,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    wait_ms = wait,
                    error = %last,
                    "fetch attempt failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(wait)).await;
            }
        }

        tracing::error!(source = name, attempts, error = %last, "fetch retries exhausted");
        Err(BenchError::RetriesExhausted {
            source_name: name.to_string(),
            attempts,
            last: Box::new(last),
        })
    }
}

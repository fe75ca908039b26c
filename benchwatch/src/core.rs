use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use benchwatch_core::{BackoffConfig, BenchError, PriceSource, SourceRegistry, WatcherConfig};
use benchwatch_middleware::SourceBuilder;

use crate::store::RecordStore;

/// Orchestrator that updates commodity records from registered sources.
pub struct Watcher {
    pub(crate) registry: SourceRegistry,
    pub(crate) store: RecordStore,
    pub(crate) cfg: WatcherConfig,
}

impl Watcher {
    /// Start building a watcher.
    #[must_use]
    pub fn builder() -> WatcherBuilder {
        WatcherBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &WatcherConfig {
        &self.cfg
    }

    /// The record store updates are written to.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Registered (wrapped) sources.
    #[must_use]
    pub const fn registry(&self) -> &SourceRegistry {
        &self.registry
    }
}

/// Builder for a [`Watcher`].
///
/// Every registered source is wrapped in the retry middleware using the
/// configured backoff and per-attempt timeout.
pub struct WatcherBuilder {
    sources: Vec<Arc<dyn PriceSource>>,
    cfg: WatcherConfig,
}

impl Default for WatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WatcherBuilder {
    /// Builder with [`WatcherConfig::default`] and no sources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            cfg: WatcherConfig::default(),
        }
    }

    /// Register a raw source. A later source for the same kind replaces an earlier one.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Register several raw sources.
    #[must_use]
    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn PriceSource>>,
    {
        self.sources.extend(sources);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: WatcherConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Directory holding the records.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.data_dir = dir.into();
        self
    }

    /// Number of most recent observations kept per commodity.
    #[must_use]
    pub const fn retention(mut self, n: usize) -> Self {
        self.cfg.retention = n;
        self
    }

    /// Maximum concurrent commodity updates in a batch.
    #[must_use]
    pub const fn concurrency(mut self, n: usize) -> Self {
        self.cfg.concurrency = n;
        self
    }

    /// Timeout for a single fetch attempt.
    #[must_use]
    pub const fn source_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.source_timeout = timeout;
        self
    }

    /// Retry policy for every source.
    #[must_use]
    pub const fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.cfg.backoff = backoff;
        self
    }

    /// Build the watcher.
    ///
    /// # Errors
    /// `InvalidArg` when no source is registered or when retention or
    /// concurrency is zero; `Storage` when the data directory cannot be
    /// created.
    pub fn build(self) -> Result<Watcher, BenchError> {
        if self.sources.is_empty() {
            return Err(BenchError::InvalidArg("no price sources registered".into()));
        }
        if self.cfg.retention == 0 {
            return Err(BenchError::InvalidArg("retention must be positive".into()));
        }
        if self.cfg.concurrency == 0 {
            return Err(BenchError::InvalidArg("concurrency must be positive".into()));
        }

        let store = RecordStore::open(self.cfg.data_dir.clone())?;

        let mut registry = SourceRegistry::new();
        for raw in self.sources {
            registry.register(
                SourceBuilder::new(raw)
                    .with_retry(self.cfg.backoff, self.cfg.source_timeout)
                    .build(),
            );
        }

        Ok(Watcher {
            registry,
            store,
            cfg: self.cfg,
        })
    }
}

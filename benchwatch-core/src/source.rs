use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{BenchError, RawObservation, SourceKind, SourceParams};

/// Capability implemented by every upstream price feed.
///
/// Implementations return observations oldest first with dates exactly as the
/// upstream wrote them. Expected failure modes (missing key, bad status,
/// malformed payload, empty result) are reported as errors; they never panic.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Human-readable label used in logs and errors, e.g. `"FRED"`.
    fn name(&self) -> &'static str;

    /// The source family this implementation serves.
    fn kind(&self) -> SourceKind;

    /// Fetch raw observations for `params`.
    ///
    /// Callers only pass params whose [`SourceParams::kind`] equals
    /// [`PriceSource::kind`]; implementations reject anything else with
    /// [`BenchError::InvalidArg`].
    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError>;
}

/// Lookup table from [`SourceKind`] to the source that serves it.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<SourceKind, Arc<dyn PriceSource>>,
}

impl SourceRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source` under its own kind, replacing any previous entry.
    pub fn register(&mut self, source: Arc<dyn PriceSource>) {
        self.sources.insert(source.kind(), source);
    }

    /// Source for `kind`.
    ///
    /// # Errors
    /// Returns [`BenchError::UnsupportedSource`] when nothing is registered.
    pub fn get(&self, kind: SourceKind) -> Result<&Arc<dyn PriceSource>, BenchError> {
        self.sources
            .get(&kind)
            .ok_or_else(|| BenchError::UnsupportedSource {
                kind: kind.to_string(),
            })
    }

    /// Registered kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<_> = self.sources.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Number of registered sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when no source is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Replace every source with `wrap(source)`, e.g. to layer middleware.
    #[must_use]
    pub fn map_sources<F>(self, mut wrap: F) -> Self
    where
        F: FnMut(Arc<dyn PriceSource>) -> Arc<dyn PriceSource>,
    {
        Self {
            sources: self
                .sources
                .into_iter()
                .map(|(k, s)| (k, wrap(s)))
                .collect(),
        }
    }
}

impl core::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

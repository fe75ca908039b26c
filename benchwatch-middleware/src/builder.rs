//! Layer middleware around a raw source.
//!
//! Layers are stored outermost first (the last one added ends up outermost)
//! and applied in reverse by [`SourceBuilder::build`], so
//! `SourceBuilder::new(raw).with(a).with(b)` yields `b(a(raw))`.

use std::sync::Arc;
use std::time::Duration;

use benchwatch_core::{BackoffConfig, PriceSource};

use crate::retry::RetryMiddleware;

/// A wrapper that can be applied to a source.
pub trait SourceMiddleware: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Wrap `inner`.
    fn apply(self: Box<Self>, inner: Arc<dyn PriceSource>) -> Arc<dyn PriceSource>;
}

struct RetryLayer {
    backoff: BackoffConfig,
    attempt_timeout: Duration,
}

impl SourceMiddleware for RetryLayer {
    fn name(&self) -> &'static str {
        "RetryMiddleware"
    }

    fn apply(self: Box<Self>, inner: Arc<dyn PriceSource>) -> Arc<dyn PriceSource> {
        Arc::new(RetryMiddleware::new(inner, self.backoff, self.attempt_timeout))
    }
}

/// Composes a source with middleware layers.
pub struct SourceBuilder {
    raw: Arc<dyn PriceSource>,
    /// Outermost first.
    layers: Vec<Box<dyn SourceMiddleware>>,
}

impl SourceBuilder {
    /// Start from an unwrapped source.
    #[must_use]
    pub fn new(raw: Arc<dyn PriceSource>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add an arbitrary layer as the new outermost one.
    #[must_use]
    pub fn with(mut self, layer: Box<dyn SourceMiddleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Add (or replace) the retry layer.
    #[must_use]
    pub fn with_retry(mut self, backoff: BackoffConfig, attempt_timeout: Duration) -> Self {
        self.layers.retain(|l| l.name() != "RetryMiddleware");
        self.with(Box::new(RetryLayer {
            backoff,
            attempt_timeout,
        }))
    }

    /// Names of configured layers, outermost first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Apply all layers.
    #[must_use]
    pub fn build(self) -> Arc<dyn PriceSource> {
        self.layers
            .into_iter()
            .rev()
            .fold(self.raw, |inner, layer| layer.apply(inner))
    }
}

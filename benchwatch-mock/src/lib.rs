//! Mock price sources for CI-safe tests.
//!
//! [`MockSource`] serves deterministic fixtures keyed by series key and honors
//! two magic keys: `FAIL` (transport-style failure) and `TIMEOUT` (200 ms
//! delay before answering). [`DynamicMockSource`] defers every call to a test
//! controller.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use benchwatch_core::{BenchError, PriceSource, RawObservation, SourceKind, SourceParams};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};

/// The key a mock uses to pick its answer for `params`.
///
/// FRED series id, the EIA `series` facet (comma-joined), the FreeGold data
/// type, the Yahoo symbol, or `simulated`.
#[must_use]
pub fn series_key(params: &SourceParams) -> String {
    match params {
        SourceParams::Fred { series_id } => series_id.clone(),
        SourceParams::Eia { facets, .. } => facets
            .get("series")
            .map(|v| v.join(","))
            .unwrap_or_default(),
        SourceParams::FreeGold { data_type } => data_type.clone(),
        SourceParams::Yahoo { symbol } => symbol.clone(),
        _ => "simulated".to_string(),
    }
}

/// Mock source with deterministic fixture data.
pub struct MockSource {
    kind: SourceKind,
    extra: HashMap<String, Vec<RawObservation>>,
    calls: AtomicUsize,
}

impl MockSource {
    /// A mock serving the built-in fixtures under `kind`.
    #[must_use]
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            extra: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Serve `rows` for `key`, overriding any built-in fixture.
    #[must_use]
    pub fn with_series(mut self, key: impl Into<String>, rows: Vec<RawObservation>) -> Self {
        self.extra.insert(key.into(), rows);
        self
    }

    /// One plain mock per source kind.
    #[must_use]
    pub fn all_kinds() -> Vec<Arc<dyn PriceSource>> {
        SourceKind::ALL
            .into_iter()
            .map(|k| Arc::new(Self::new(k)) as Arc<dyn PriceSource>)
            .collect()
    }

    /// Number of `fetch` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Keys with built-in fixtures.
    pub fn fixture_keys() -> Vec<&'static str> {
        fixtures::known_keys().collect()
    }
}

#[async_trait]
impl PriceSource for MockSource {
    fn name(&self) -> &'static str {
        "benchwatch-mock"
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = series_key(params);
        match key.as_str() {
            "FAIL" => return Err(BenchError::fetch(self.name(), "forced failure")),
            "TIMEOUT" => tokio::time::sleep(std::time::Duration::from_millis(200)).await,
            _ => {}
        }
        self.extra
            .get(&key)
            .cloned()
            .or_else(|| fixtures::series(&key))
            .ok_or_else(|| BenchError::no_data(format!("mock series {key}")))
    }
}

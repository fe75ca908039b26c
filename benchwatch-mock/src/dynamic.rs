use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use benchwatch_core::{BenchError, PriceSource, RawObservation, SourceKind, SourceParams};

use crate::series_key;

/// Instruction for how one fetch should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the rows immediately.
    Return(Vec<RawObservation>),
    /// Fail immediately with the error.
    Fail(BenchError),
    /// Never complete (simulate a stalled upstream).
    Hang,
}

#[derive(Default)]
struct InternalState {
    /// Per key: behaviors consumed front to back; the last one repeats.
    rules: HashMap<String, VecDeque<MockBehavior>>,
    calls: HashMap<String, usize>,
}

/// Controller handle used by tests to drive a [`DynamicMockSource`].
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Always behave as `behavior` for `key`.
    pub async fn set_behavior(&self, key: impl Into<String>, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(key.into(), VecDeque::from([behavior]));
    }

    /// Behave as each entry of `script` in turn; the final entry repeats.
    pub async fn set_script(&self, key: impl Into<String>, script: Vec<MockBehavior>) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(key.into(), script.into());
    }

    /// Number of fetches seen for `key`.
    pub async fn calls(&self, key: &str) -> usize {
        let guard = self.state.lock().await;
        guard.calls.get(key).copied().unwrap_or(0)
    }

    /// Clear all rules and call counts.
    pub async fn clear_all(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.calls.clear();
    }
}

/// A source that defers all behavior to an external controller.
///
/// Keys without a rule answer with [`BenchError::NoData`].
pub struct DynamicMockSource {
    kind: SourceKind,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a dynamic mock registered under `kind` and its controller.
    #[must_use]
    pub fn new_with_controller(kind: SourceKind) -> (Arc<dyn PriceSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { kind, state });
        (me as Arc<dyn PriceSource>, controller)
    }

    /// One dynamic mock per source kind, all driven by the same controller.
    #[must_use]
    pub fn all_kinds_with_controller() -> (Vec<Arc<dyn PriceSource>>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let sources = SourceKind::ALL
            .into_iter()
            .map(|kind| {
                Arc::new(Self {
                    kind,
                    state: Arc::clone(&state),
                }) as Arc<dyn PriceSource>
            })
            .collect();
        (sources, controller)
    }
}

#[async_trait]
impl PriceSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        "benchwatch-dynamic-mock"
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        let key = series_key(params);
        // Take the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry(key.clone()).or_insert(0) += 1;
            guard.rules.get_mut(&key).and_then(|script| {
                if script.len() > 1 {
                    script.pop_front()
                } else {
                    script.front().cloned()
                }
            })
        };

        match behavior {
            Some(MockBehavior::Return(rows)) => Ok(rows),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(BenchError::no_data(format!("dynamic mock series {key}"))),
        }
    }
}

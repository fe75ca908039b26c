//! Observation, history, and record types.
//!
//! Shared DTOs from `benchwatch-types` are re-exported here so downstream
//! crates only need to depend on `benchwatch-core`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use benchwatch_types::{
    BackoffConfig, BatchReport, BenchError, Category, CommodityConfig, DEFAULT_RETENTION,
    DisplayRange, FailedUpdate, SourceClass, SourceKind, SourceParams, StorageErrorKind,
    WatcherConfig,
};

use crate::metrics::MetricsSnapshot;

/// One dated price point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Price on that date.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Observation {
    /// Construct an observation.
    #[must_use]
    pub const fn new(date: NaiveDate, price: Decimal) -> Self {
        Self { date, price }
    }
}

/// Uniform output of every price source: a date exactly as the upstream wrote
/// it, plus a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Unparsed date string.
    pub date: String,
    /// Price value.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl RawObservation {
    /// Construct a raw observation.
    pub fn new(date: impl Into<String>, price: Decimal) -> Self {
        Self {
            date: date.into(),
            price,
        }
    }
}

/// Price history, oldest first, with unique and strictly increasing dates.
///
/// The only ways to grow a history are [`crate::merge_history`] and
/// [`History::from_observations`]; both keep the ordering invariant. Decoding
/// from JSON goes through the same path, so a hand-edited file with duplicate
/// or unsorted dates is normalized on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct History(Vec<Observation>);

impl History {
    /// An empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a history from arbitrary observations. Later entries win on
    /// duplicate dates.
    pub fn from_observations<I>(obs: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let map: BTreeMap<NaiveDate, Decimal> =
            obs.into_iter().map(|o| (o.date, o.price)).collect();
        Self(
            map.into_iter()
                .map(|(date, price)| Observation { date, price })
                .collect(),
        )
    }

    /// Number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no observations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Observations, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Observation] {
        &self.0
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> core::slice::Iter<'_, Observation> {
        self.0.iter()
    }

    /// Most recent observation.
    #[must_use]
    pub fn latest(&self) -> Option<&Observation> {
        self.0.last()
    }

    /// Observation `k` positions before the latest (`k = 0` is the latest).
    #[must_use]
    pub fn back(&self, k: usize) -> Option<&Observation> {
        self.0.len().checked_sub(k + 1).and_then(|i| self.0.get(i))
    }

    /// Keep only the `n` most recent observations.
    pub fn retain_recent(&mut self, n: usize) {
        if self.0.len() > n {
            let excess = self.0.len() - n;
            self.0.drain(..excess);
        }
    }

    /// Consume into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Observation> {
        self.0
    }
}

impl From<Vec<Observation>> for History {
    fn from(v: Vec<Observation>) -> Self {
        Self::from_observations(v)
    }
}

impl From<History> for Vec<Observation> {
    fn from(h: History) -> Self {
        h.0
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Observation;
    type IntoIter = core::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The persisted unit: one per commodity, overwritten once per successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityRecord {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grouping.
    pub category: Category,
    /// Quoting unit.
    pub unit: String,
    /// Quote currency.
    pub currency: String,
    /// Latest price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Date of the latest price.
    pub date: NaiveDate,
    /// Provider display name.
    pub source_name: String,
    /// Source family.
    pub source_type: SourceKind,
    /// Provenance class derived from `source_type`.
    pub source_class: SourceClass,
    /// Provenance link; empty when the catalog has none.
    #[serde(default)]
    pub source_url: String,
    /// Set when the history is synthetic and must never seed a future merge.
    #[serde(default)]
    pub simulated: bool,
    /// Full retained history.
    pub history: History,
    /// Statistics computed from `history` at build time.
    #[serde(default)]
    pub metrics: MetricsSnapshot,
    /// When this record was built. Offset-less timestamps read as UTC.
    #[serde(deserialize_with = "lenient_utc::deserialize")]
    pub updated_at: DateTime<Utc>,
}

mod lenient_utc {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    /// RFC 3339, or a naive ISO datetime taken as UTC.
    pub(super) fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|n| n.and_utc())
            .map_err(|e| D::Error::custom(format!("invalid updated_at '{raw}': {e}")))
    }
}

/// Result of updating a single commodity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record was rebuilt and saved.
    Success {
        /// The saved record.
        record: Box<CommodityRecord>,
    },
    /// Nothing was saved; the previously stored record is untouched.
    Failure {
        /// Catalog id.
        id: String,
        /// Display name.
        name: String,
        /// What went wrong.
        reason: BenchError,
    },
}

impl UpdateOutcome {
    /// Whether the update succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Id of the commodity this outcome is for.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Success { record } => &record.id,
            Self::Failure { id, .. } => id,
        }
    }
}

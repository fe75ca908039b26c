use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::timeseries::date::DateNormalizer;
use crate::types::{History, Observation, RawObservation};

/// Merge `incoming` observations into `existing`.
///
/// - Entries are keyed by date; an incoming observation replaces any existing
///   one at the same date, and later incoming entries replace earlier ones.
/// - The result is sorted ascending by date.
/// - Idempotent: merging the same batch twice equals merging it once.
/// - No retention is applied here; callers truncate with
///   [`History::retain_recent`].
pub fn merge_history<I>(existing: History, incoming: I) -> History
where
    I: IntoIterator<Item = Observation>,
{
    let mut by_date: BTreeMap<NaiveDate, Decimal> = existing
        .into_vec()
        .into_iter()
        .map(|o| (o.date, o.price))
        .collect();
    for o in incoming {
        by_date.insert(o.date, o.price);
    }
    History::from_observations(
        by_date
            .into_iter()
            .map(|(date, price)| Observation { date, price }),
    )
}

/// Normalize the dates of a raw fetch batch.
///
/// Rows whose date matches no known format are dropped; the second element of
/// the returned tuple counts them. Order is preserved.
pub fn normalize_observations(raw: Vec<RawObservation>) -> (Vec<Observation>, usize) {
    let mut normalizer = DateNormalizer::new();
    let mut dropped = 0usize;
    let mut out = Vec::with_capacity(raw.len());
    for r in raw {
        match normalizer.normalize(&r.date) {
            Ok(date) => out.push(Observation::new(date, r.price)),
            Err(e) => {
                tracing::debug!(raw = %r.date, error = %e, "dropping row with unparseable date");
                dropped += 1;
            }
        }
    }
    (out, dropped)
}

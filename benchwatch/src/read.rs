//! Read-only projections of stored records for the web UI, JSON API, and bots.
//!
//! Nothing here recomputes statistics. Metrics come from the stored record
//! as-is; range filters work on a copy of the history.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use benchwatch_core::{
    Category, CommodityRecord, DisplayRange, History, MetricsSnapshot, Observation, SourceClass,
    SourceKind,
};

use crate::store::{RecordStore, validate_id};

/// Copy of `history` restricted to `range`, anchored at the latest observation.
///
/// Keeps entries dated on or after `latest - days`. If the window would be
/// empty the latest observation alone is returned. `ALL` and empty histories
/// return a full copy.
#[must_use]
pub fn filter_history_for_display(history: &History, range: DisplayRange) -> Vec<Observation> {
    let (Some(days), Some(latest)) = (range.days(), history.latest()) else {
        return history.as_slice().to_vec();
    };
    let cutoff = latest.date - Duration::days(days);
    let kept: Vec<Observation> = history
        .iter()
        .filter(|o| o.date >= cutoff)
        .copied()
        .collect();
    if kept.is_empty() {
        vec![*latest]
    } else {
        kept
    }
}

/// A record as presented to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommodityView {
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
    /// Price of the last displayed observation.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Date of the last displayed observation.
    pub date: NaiveDate,
    /// Provider display name.
    pub source_name: String,
    /// Source family.
    pub source_type: SourceKind,
    /// Provenance class.
    pub source_class: SourceClass,
    /// Provenance link.
    pub source_url: String,
    /// Synthetic data flag.
    pub simulated: bool,
    /// Range applied to `display_history`.
    pub range: DisplayRange,
    /// Filtered copy of the stored history.
    pub display_history: Vec<Observation>,
    /// Stored metrics, passed through.
    pub metrics: MetricsSnapshot,
    /// `abs_change_1_obs` of the stored metrics.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub change: Option<Decimal>,
    /// `pct_change_1_obs` of the stored metrics.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub change_percent: Option<Decimal>,
    /// Observation before the latest one (the latest itself if there is only one).
    #[serde(with = "rust_decimal::serde::float")]
    pub prev_price: Decimal,
    /// Date of `prev_price`.
    pub prev_date: NaiveDate,
    /// When the record was built.
    pub updated_at: DateTime<Utc>,
}

impl CommodityView {
    /// Project `record` through `range`.
    #[must_use]
    pub fn from_record(record: CommodityRecord, range: DisplayRange) -> Self {
        let display_history = filter_history_for_display(&record.history, range);
        let (price, date) = display_history
            .last()
            .map_or((record.price, record.date), |o| (o.price, o.date));
        let (prev_price, prev_date) = record
            .history
            .back(1)
            .map_or((record.price, record.date), |o| (o.price, o.date));

        Self {
            id: record.id,
            name: record.name,
            category: record.category,
            unit: record.unit,
            currency: record.currency,
            price,
            date,
            source_name: record.source_name,
            source_type: record.source_type,
            source_class: record.source_class,
            source_url: record.source_url,
            simulated: record.simulated,
            range,
            display_history,
            change: record.metrics.abs_change_1_obs,
            change_percent: record.metrics.pct_change_1_obs,
            metrics: record.metrics,
            prev_price,
            prev_date,
            updated_at: record.updated_at,
        }
    }

    /// One-observation percentage change, zero when absent.
    #[must_use]
    pub fn change_percent_or_zero(&self) -> Decimal {
        self.change_percent.unwrap_or(Decimal::ZERO)
    }
}

/// Filter for [`list_commodities`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Only this category, if set.
    pub category: Option<Category>,
    /// Display range for each view.
    pub range: DisplayRange,
}

/// Every readable record matching `filter`, sorted by name.
///
/// Unreadable files are skipped (and logged by the store).
#[must_use]
pub fn list_commodities(store: &RecordStore, filter: ListFilter) -> Vec<CommodityView> {
    let ids = match store.list_ids() {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(error = %e, "cannot list records");
            return Vec::new();
        }
    };
    let mut views: Vec<CommodityView> = ids
        .iter()
        .filter_map(|id| store.load(id))
        .filter(|r| filter.category.is_none_or(|c| r.category == c))
        .map(|r| CommodityView::from_record(r, filter.range))
        .collect();
    views.sort_by(|a, b| a.name.cmp(&b.name));
    views
}

/// A single commodity with its full history; `None` when missing or unreadable.
#[must_use]
pub fn get_commodity(store: &RecordStore, id: &str) -> Option<CommodityView> {
    if validate_id(id).is_err() {
        return None;
    }
    store
        .load(id)
        .map(|r| CommodityView::from_record(r, DisplayRange::All))
}

/// Chat shorthand for common commodities.
const ALIASES: &[(&str, &str)] = &[
    ("brent", "brent_oil"),
    ("oil", "brent_oil"),
    ("crude", "brent_oil"),
    ("wti", "wti_oil"),
    ("gas", "natural_gas"),
    ("natgas", "natural_gas"),
    ("heating", "heating_oil"),
    ("jet", "jet_fuel"),
];

/// Map a chat alias to its commodity id.
#[must_use]
pub fn resolve_alias(query: &str) -> Option<&'static str> {
    let q = query.trim().to_ascii_lowercase();
    ALIASES.iter().find(|(a, _)| *a == q).map(|(_, id)| *id)
}

/// Find a commodity by alias, then exact id, then partial name (case-insensitive).
#[must_use]
pub fn search_commodity(store: &RecordStore, query: &str) -> Option<CommodityView> {
    let q = query.trim().to_ascii_lowercase();
    if q.is_empty() {
        return None;
    }
    if let Some(id) = resolve_alias(&q) {
        return get_commodity(store, id);
    }
    if let Some(view) = get_commodity(store, &q) {
        return Some(view);
    }
    list_commodities(store, ListFilter::default())
        .into_iter()
        .find(|v| v.name.to_lowercase().contains(&q))
}

/// Largest one-observation moves: `(gainers, losers)`, each at most `limit` long.
///
/// Gainers are strictly positive, largest first. Losers are strictly
/// negative, most negative first. Missing changes count as zero.
#[must_use]
pub fn top_movers(store: &RecordStore, limit: usize) -> (Vec<CommodityView>, Vec<CommodityView>) {
    let mut all = list_commodities(store, ListFilter::default());
    all.sort_by(|a, b| b.change_percent_or_zero().cmp(&a.change_percent_or_zero()));

    let losers: Vec<CommodityView> = all
        .iter()
        .rev()
        .filter(|v| v.change_percent_or_zero() < Decimal::ZERO)
        .take(limit)
        .cloned()
        .collect();
    let gainers: Vec<CommodityView> = all
        .into_iter()
        .filter(|v| v.change_percent_or_zero() > Decimal::ZERO)
        .take(limit)
        .collect();
    (gainers, losers)
}

/// Insert thousands separators into the integer part of a 2 dp price.
fn group_thousands(value: Decimal) -> String {
    let fixed = format!("{:.2}", value.round_dp(2));
    let (sign, body) = fixed
        .strip_prefix('-')
        .map_or(("", fixed.as_str()), |rest| ("-", rest));
    let (int, frac) = body.split_once('.').unwrap_or((body, "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac}")
}

/// One-line summary, e.g. `Gold: $2,310.00 (+0.37%) as of 2024-05-02`.
///
/// The percentage is the one-observation change; it says nothing about what
/// happens next.
#[must_use]
pub fn format_price_line(view: &CommodityView) -> String {
    let pct = view.change_percent_or_zero().round_dp(2);
    let sign = if pct > Decimal::ZERO { "+" } else { "" };
    format!(
        "{}: ${} ({sign}{pct:.2}%) as of {}",
        view.name,
        group_thousands(view.price),
        view.date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hist(dates: &[&str]) -> History {
        History::from_observations(
            dates
                .iter()
                .enumerate()
                .map(|(i, d)| Observation::new(d.parse().unwrap(), Decimal::from(i as u32 + 1))),
        )
    }

    #[test]
    fn window_is_anchored_at_latest_observation() {
        let h = hist(&["2023-01-01", "2023-06-01", "2023-06-25", "2023-07-01"]);
        let week = filter_history_for_display(&h, DisplayRange::OneWeek);
        let dates: Vec<String> = week.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(dates, vec!["2023-06-25", "2023-07-01"]);

        let month = filter_history_for_display(&h, DisplayRange::OneMonth);
        assert_eq!(month.len(), 3);
        assert_eq!(filter_history_for_display(&h, DisplayRange::All).len(), 4);
    }

    #[test]
    fn cutoff_is_inclusive() {
        let h = hist(&["2024-01-01", "2024-01-08"]);
        assert_eq!(filter_history_for_display(&h, DisplayRange::OneWeek).len(), 2);
    }

    #[test]
    fn empty_history_stays_empty() {
        assert!(filter_history_for_display(&History::new(), DisplayRange::OneWeek).is_empty());
    }

    #[test]
    fn aliases() {
        assert_eq!(resolve_alias("Crude"), Some("brent_oil"));
        assert_eq!(resolve_alias(" natgas "), Some("natural_gas"));
        assert_eq!(resolve_alias("gold"), None);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(dec!(2310)), "2,310.00");
        assert_eq!(group_thousands(dec!(980000.5)), "980,000.50");
        assert_eq!(group_thousands(dec!(2.345)), "2.34");
        assert_eq!(group_thousands(dec!(-1234.5)), "-1,234.50");
        assert_eq!(group_thousands(dec!(999)), "999.00");
    }

    proptest::proptest! {
        #[test]
        fn display_window_is_a_suffix_ending_at_latest(
            offsets in proptest::collection::btree_set(0i64..800, 1..60),
            range_idx in 0usize..6,
        ) {
            let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
            let h = History::from_observations(
                offsets.iter().map(|d| Observation::new(base + Duration::days(*d), Decimal::ONE)),
            );
            let range = [
                DisplayRange::OneWeek,
                DisplayRange::OneMonth,
                DisplayRange::ThreeMonths,
                DisplayRange::SixMonths,
                DisplayRange::OneYear,
                DisplayRange::All,
            ][range_idx];

            let shown = filter_history_for_display(&h, range);
            proptest::prop_assert!(!shown.is_empty());
            proptest::prop_assert_eq!(shown.last(), h.latest());
            proptest::prop_assert_eq!(shown.as_slice(), &h.as_slice()[h.len() - shown.len()..]);
            if range == DisplayRange::All {
                proptest::prop_assert_eq!(shown.len(), h.len());
            }
        }
    }
}

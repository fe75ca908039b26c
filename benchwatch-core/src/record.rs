use chrono::{DateTime, Utc};

use crate::metrics::MetricsSnapshot;
use crate::types::{BenchError, CommodityConfig, CommodityRecord, History};

/// Assemble the persisted record for `config` from a merged history.
///
/// Pure: the caller supplies `updated_at`. `source_class` follows the source
/// kind (FRED and EIA are official benchmarks, everything else is a public
/// market reference).
///
/// # Errors
/// Returns [`BenchError::EmptyHistory`] when `history` has no observations.
pub fn build_record(
    config: &CommodityConfig,
    history: History,
    metrics: MetricsSnapshot,
    simulated: bool,
    updated_at: DateTime<Utc>,
) -> Result<CommodityRecord, BenchError> {
    let latest = *history.latest().ok_or_else(|| BenchError::EmptyHistory {
        id: config.id.clone(),
    })?;
    let kind = config.source_kind();

    Ok(CommodityRecord {
        id: config.id.clone(),
        name: config.name.clone(),
        category: config.category,
        unit: config.unit.clone(),
        currency: config.currency.clone(),
        price: latest.price,
        date: latest.date,
        source_name: config.effective_source_name(),
        source_type: kind,
        source_class: kind.source_class(),
        source_url: config.source_info_url.clone().unwrap_or_default(),
        simulated,
        history,
        metrics,
        updated_at,
    })
}

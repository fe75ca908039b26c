use std::collections::HashSet;

use benchwatch_core::{
    BatchReport, BenchError, CommodityConfig, CommodityRecord, FailedUpdate, UpdateOutcome,
    build_record, compute_metrics, merge_history, normalize_observations,
};
use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::core::Watcher;

/// Reject catalogs that name the same id twice.
///
/// # Errors
/// `InvalidArg` naming the first duplicate.
pub fn ensure_unique_ids(configs: &[CommodityConfig]) -> Result<(), BenchError> {
    let mut seen = HashSet::with_capacity(configs.len());
    for c in configs {
        if !seen.insert(c.id.as_str()) {
            return Err(BenchError::InvalidArg(format!(
                "duplicate commodity id '{}'",
                c.id
            )));
        }
    }
    Ok(())
}

impl Watcher {
    /// Fetch, merge, and save one commodity.
    ///
    /// Loads the prior history (empty if missing, unreadable, or simulated),
    /// fetches through the source registered for the commodity's source kind,
    /// merges, keeps the newest `retention` observations, recomputes metrics,
    /// and atomically saves the rebuilt record. Any failure is returned as
    /// [`UpdateOutcome::Failure`] and leaves the stored record untouched.
    #[tracing::instrument(skip(self, config), fields(commodity = %config.id, source = %config.source_kind()))]
    pub async fn update(&self, config: &CommodityConfig) -> UpdateOutcome {
        match self.try_update(config).await {
            Ok(record) => {
                tracing::info!(
                    price = %record.price,
                    date = %record.date,
                    observations = record.history.len(),
                    "updated"
                );
                UpdateOutcome::Success {
                    record: Box::new(record),
                }
            }
            Err(reason) => {
                tracing::warn!(name = %config.name, error = %reason, "update failed");
                UpdateOutcome::Failure {
                    id: config.id.clone(),
                    name: config.name.clone(),
                    reason,
                }
            }
        }
    }

    async fn try_update(&self, config: &CommodityConfig) -> Result<CommodityRecord, BenchError> {
        let kind = config.source_kind();
        let existing = self.store.load_history_for_merge(&config.id);
        let source = self.registry.get(kind)?;

        let raw = source.fetch(&config.source).await?;
        let (incoming, dropped) = normalize_observations(raw);
        if dropped > 0 {
            tracing::warn!(dropped, "dropped rows with unparseable dates");
        }
        if incoming.is_empty() {
            return Err(BenchError::no_data(config.source.describe()));
        }

        let mut history = merge_history(existing, incoming);
        history.retain_recent(self.cfg.retention);
        let metrics = compute_metrics(&history);
        let record = build_record(config, history, metrics, kind.is_simulated(), Utc::now())?;

        self.store.save(&config.id, &record)?;
        Ok(record)
    }

    /// Update every commodity in `configs`, at most `concurrency` at a time.
    ///
    /// Individual failures never stop the batch. The report lists ids in the
    /// order of `configs`.
    ///
    /// # Errors
    /// `InvalidArg` if two configs share an id; nothing is fetched in that case.
    #[tracing::instrument(skip_all, fields(commodities = configs.len()))]
    pub async fn update_all(&self, configs: &[CommodityConfig]) -> Result<BatchReport, BenchError> {
        ensure_unique_ids(configs)?;

        let mut outcomes: Vec<(usize, UpdateOutcome)> = stream::iter(configs.iter().enumerate())
            .map(|(idx, cfg)| async move { (idx, self.update(cfg).await) })
            .buffer_unordered(self.cfg.concurrency.max(1))
            .collect()
            .await;
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut report = BatchReport::default();
        for (_, outcome) in outcomes {
            match outcome {
                UpdateOutcome::Success { record } => report.succeeded.push(record.id),
                UpdateOutcome::Failure { id, name, reason } => {
                    report.failed.push(FailedUpdate { id, name, reason });
                }
            }
        }

        tracing::info!(
            succeeded = report.success_count(),
            failed = report.failure_count(),
            "batch update finished"
        );
        if report.failure_count() > 0 {
            tracing::warn!(failed = ?report.failed_names(), "some commodities were not updated");
        }
        Ok(report)
    }
}

//! Report envelopes produced by batch updates.

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// A commodity whose update did not produce a saved record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUpdate {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What went wrong.
    pub reason: BenchError,
}

/// Summary of one batch update run.
///
/// `succeeded` and `failed` preserve the catalog order of the input, regardless
/// of the order in which the concurrent updates finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BatchReport {
    /// Ids that were fetched, merged, and saved.
    pub succeeded: Vec<String>,
    /// Ids that failed, with their reasons.
    pub failed: Vec<FailedUpdate>,
}

impl BatchReport {
    /// Number of commodities saved.
    #[must_use]
    pub const fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of commodities that failed.
    #[must_use]
    pub const fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Display names of failed commodities, in input order.
    #[must_use]
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.name.as_str()).collect()
    }

    /// Total number of commodities processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

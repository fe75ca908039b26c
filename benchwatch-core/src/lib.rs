//! benchwatch-core
//!
//! Core types, traits, and utilities shared across the BenchmarkWatcher workspace.
//!
//! - `types`: observations, histories, and the persisted commodity record.
//! - `source`: the `PriceSource` capability trait and the `SourceRegistry` lookup table.
//! - `timeseries`: date normalization and history merging.
//! - `metrics`: observation-indexed descriptive statistics.
//! - `record`: assembly of a `CommodityRecord` from a merged history.
//!
//! Every statistic here is defined in terms of observation positions. A
//! "30-observation change" on a monthly series spans thirty months, not thirty
//! days, and nothing in this crate converts between the two.
#![warn(missing_docs)]

/// Observation-indexed statistics over a history.
pub mod metrics;
/// Record assembly.
pub mod record;
/// Price source capability trait and registry.
pub mod source;
/// Date normalization and merge helpers.
pub mod timeseries;
pub mod types;

pub use metrics::{Direction, MetricsSnapshot, compute_metrics};
pub use record::build_record;
pub use source::{PriceSource, SourceRegistry};
pub use timeseries::date::DateNormalizer;
pub use timeseries::merge::{merge_history, normalize_observations};
pub use types::*;

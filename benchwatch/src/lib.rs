//! BenchmarkWatcher tracks daily commodity benchmark prices.
//!
//! Overview
//! - [`Watcher`] runs the update pipeline for each commodity: load the prior
//!   record, fetch through the registered [`benchwatch_core::PriceSource`],
//!   merge by date, truncate to the retention window, compute metrics, and
//!   atomically save the rebuilt record.
//! - [`Watcher::update_all`] runs a whole catalog with bounded concurrency. One
//!   commodity failing never stops the others; the [`BatchReport`] names every
//!   failure.
//! - [`RecordStore`] keeps one JSON file per commodity and never exposes a
//!   partially written record.
//! - [`read`] serves stored records to UIs and bots without recomputing
//!   anything.
//!
//! All statistics are per observation. A 30-observation change on a monthly
//! FRED series covers thirty months; nothing here converts to calendar time.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use benchwatch::{Watcher, catalog};
//! use benchwatch_sources::{Credentials, default_sources};
//!
//! let watcher = Watcher::builder()
//!     .with_sources(default_sources(Credentials::from_env()))
//!     .data_dir("data")
//!     .build()?;
//! let report = watcher.update_all(&catalog::default_catalog()).await?;
//! println!("{} ok, {} failed", report.success_count(), report.failure_count());
//! ```
#![warn(missing_docs)]

/// Built-in commodity catalog.
pub mod catalog;
mod core;
/// Read API for UIs and bots.
pub mod read;
/// Atomic per-commodity JSON store.
pub mod store;
mod update;

pub use crate::core::{Watcher, WatcherBuilder};
pub use benchwatch_core::{
    BackoffConfig, BatchReport, BenchError, Category, CommodityConfig, CommodityRecord,
    DisplayRange, FailedUpdate, History, MetricsSnapshot, Observation, SourceKind, SourceParams,
    UpdateOutcome, WatcherConfig,
};
pub use read::{CommodityView, ListFilter};
pub use store::RecordStore;
pub use update::ensure_unique_ids;

//! Shared BenchmarkWatcher data transfer objects: errors, configuration,
//! catalog entries, display ranges, and batch reports.
#![warn(missing_docs)]

mod commodity;
mod config;
mod range;
mod reports;
mod source;

/// Error types shared across the workspace.
pub mod error;

pub use commodity::{Category, CommodityConfig, SourceParams};
pub use config::{BackoffConfig, DEFAULT_RETENTION, WatcherConfig};
pub use error::{BenchError, StorageErrorKind};
pub use range::DisplayRange;
pub use reports::{BatchReport, FailedUpdate};
pub use source::{SourceClass, SourceKind};

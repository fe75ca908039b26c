//! Middleware wrappers for price sources.
//!
//! A wrapper takes an `Arc<dyn PriceSource>` and returns another one serving
//! the same [`benchwatch_core::SourceKind`], so wrapped and raw sources are
//! interchangeable in a [`benchwatch_core::SourceRegistry`].
#![warn(missing_docs)]

/// Builder that layers middleware around a raw source.
pub mod builder;
/// Per-attempt timeout with bounded exponential backoff.
pub mod retry;

pub use builder::{SourceBuilder, SourceMiddleware};
pub use retry::RetryMiddleware;

//! benchwatch-sources
//!
//! One [`PriceSource`] implementation per upstream feed. Each HTTP source owns
//! a `reqwest::Client`, identifies itself with the `BenchmarkWatcher/2.0`
//! user agent, and accepts a base URL override so tests can point it at a
//! local mock server.
//!
//! Sources only fetch and lightly clean rows (skip missing values, round,
//! order oldest first). Date normalization, merging, and retries happen
//! elsewhere.
#![warn(missing_docs)]

mod eia;
mod fred;
mod freegold;
mod http;
mod simulated;
mod yahoo;

use std::sync::Arc;

use benchwatch_core::PriceSource;

pub use eia::EiaSource;
pub use fred::FredSource;
pub use freegold::FreeGoldSource;
pub use http::USER_AGENT;
pub use simulated::SimulatedSource;
pub use yahoo::YahooSource;

/// Maximum number of observations requested from any upstream.
pub const FETCH_LIMIT: usize = 730;

/// API keys for the sources that need them.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// FRED API key (`FRED_API_KEY`).
    pub fred_api_key: Option<String>,
    /// EIA API key (`EIA_API_KEY`).
    pub eia_api_key: Option<String>,
}

impl Credentials {
    /// Read keys from `FRED_API_KEY` and `EIA_API_KEY`; empty values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |var: &str| std::env::var(var).ok().filter(|v| !v.trim().is_empty());
        Self {
            fred_api_key: read(fred::API_KEY_VAR),
            eia_api_key: read(eia::API_KEY_VAR),
        }
    }
}

/// Every production source, ready to register with a watcher.
#[must_use]
pub fn default_sources(creds: Credentials) -> Vec<Arc<dyn PriceSource>> {
    vec![
        Arc::new(FredSource::new(creds.fred_api_key)),
        Arc::new(EiaSource::new(creds.eia_api_key)),
        Arc::new(FreeGoldSource::new()),
        Arc::new(YahooSource::new()),
        Arc::new(SimulatedSource::new()),
    ]
}

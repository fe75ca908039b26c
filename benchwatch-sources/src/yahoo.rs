use async_trait::async_trait;
use benchwatch_core::{BenchError, PriceSource, RawObservation, SourceKind, SourceParams};
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::FETCH_LIMIT;
use crate::http;

const DEFAULT_BASE: &str = "https://query1.finance.yahoo.com";
const NAME: &str = "YAHOO";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance v8 chart endpoint, daily closes over two years.
#[derive(Debug, Clone)]
pub struct YahooSource {
    client: reqwest::Client,
    base_url: String,
}

impl Default for YahooSource {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooSource {
    /// Source against the public chart host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: http::client(),
            base_url: DEFAULT_BASE.to_string(),
        }
    }

    /// Point the source at another host.
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = http::base_url(url);
        self
    }

    fn chart_url(&self, symbol: &str) -> Result<url::Url, BenchError> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| BenchError::InvalidArg(format!("bad Yahoo base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| BenchError::InvalidArg("Yahoo base url cannot hold a path".into()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    async fn fetch_symbol(&self, symbol: &str) -> Result<Vec<RawObservation>, BenchError> {
        let req = self
            .client
            .get(self.chart_url(symbol)?)
            .query(&[("interval", "1d"), ("range", "2y")]);
        let body: ChartEnvelope = http::json(req, NAME).await?;
        let rows = body
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .map(closes)
            .unwrap_or_default();
        if rows.is_empty() {
            return Err(BenchError::no_data(format!("Yahoo {symbol}")));
        }
        Ok(rows)
    }
}

/// Zip timestamps with closes, skipping null closes; keeps the newest rows.
fn closes(result: ChartResult) -> Vec<RawObservation> {
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let mut rows: Vec<RawObservation> = result
        .timestamp
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            // Round the exact binary value, not its shortest decimal form
            let price = Decimal::from_f64_retain(close?)?.round_dp(2);
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(RawObservation::new(date.format("%Y-%m-%d").to_string(), price))
        })
        .collect();
    if rows.len() > FETCH_LIMIT {
        rows.drain(..rows.len() - FETCH_LIMIT);
    }
    rows
}

#[async_trait]
impl PriceSource for YahooSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Yahoo
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        match params {
            SourceParams::Yahoo { symbol } => self.fetch_symbol(symbol).await,
            other => Err(BenchError::InvalidArg(format!(
                "YAHOO cannot serve {} params",
                other.kind()
            ))),
        }
    }
}

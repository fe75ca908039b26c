use async_trait::async_trait;
use benchwatch_core::{BenchError, PriceSource, RawObservation, SourceKind, SourceParams};
use serde::Deserialize;

use crate::FETCH_LIMIT;
use crate::http;

pub(crate) const API_KEY_VAR: &str = "FRED_API_KEY";
const DEFAULT_BASE: &str = "https://api.stlouisfed.org";
const NAME: &str = "FRED";

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<FredRow>,
}

#[derive(Debug, Deserialize)]
struct FredRow {
    date: Option<String>,
    value: Option<String>,
}

/// St. Louis Fed series observations.
///
/// Requests the newest [`FETCH_LIMIT`] rows, drops FRED's `"."` missing-value
/// marker, and returns the rest oldest first rounded to 4 dp.
#[derive(Debug, Clone)]
pub struct FredSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FredSource {
    /// Source against the public FRED API.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http::client(),
            base_url: DEFAULT_BASE.to_string(),
            api_key,
        }
    }

    /// Point the source at another host (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = http::base_url(url);
        self
    }

    async fn fetch_series(&self, series_id: &str) -> Result<Vec<RawObservation>, BenchError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(BenchError::missing_credential(NAME, API_KEY_VAR));
        };
        let limit = FETCH_LIMIT.to_string();
        let req = self
            .client
            .get(format!("{}/fred/series/observations", self.base_url))
            .query(&[
                ("series_id", series_id),
                ("api_key", key),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ]);
        let body: ObservationsResponse = http::json(req, NAME).await?;

        let mut rows: Vec<RawObservation> = body
            .observations
            .into_iter()
            .filter_map(|row| {
                let value = row.value?;
                if matches!(value.trim(), "." | "") {
                    return None;
                }
                let price = http::parse_decimal(&value)?;
                Some(RawObservation::new(row.date?, price.round_dp(4)))
            })
            .collect();
        rows.reverse();

        if rows.is_empty() {
            return Err(BenchError::no_data(format!("FRED series {series_id}")));
        }
        Ok(rows)
    }
}

#[async_trait]
impl PriceSource for FredSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Fred
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        match params {
            SourceParams::Fred { series_id } => self.fetch_series(series_id).await,
            other => Err(BenchError::InvalidArg(format!(
                "FRED cannot serve {} params",
                other.kind()
            ))),
        }
    }
}

use async_trait::async_trait;
use benchwatch_core::{BenchError, PriceSource, RawObservation, SourceKind, SourceParams};

use crate::FETCH_LIMIT;
use crate::http;

const DEFAULT_BASE: &str = "https://freegoldapi.com";
const NAME: &str = "FREEGOLD";

/// freegoldapi.com `latest.csv`: a `date,price` CSV with a header row.
///
/// No API key. Keeps the newest [`FETCH_LIMIT`] rows, rounded to 2 dp.
#[derive(Debug, Clone)]
pub struct FreeGoldSource {
    client: reqwest::Client,
    base_url: String,
}

impl Default for FreeGoldSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeGoldSource {
    /// Source against the public host.
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

    async fn fetch_csv(&self, data_type: &str) -> Result<Vec<RawObservation>, BenchError> {
        let req = self.client.get(format!("{}/data/latest.csv", self.base_url));
        let body = http::text(req, NAME).await?;
        let rows = parse_csv(&body);
        if rows.is_empty() {
            return Err(BenchError::no_data(format!("FreeGoldAPI {data_type}")));
        }
        Ok(rows)
    }
}

fn parse_csv(body: &str) -> Vec<RawObservation> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let records: Vec<csv::StringRecord> = reader
        .records()
        .filter_map(|r| match r {
            Ok(rec) => Some(rec),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable CSV row");
                None
            }
        })
        .collect();
    let start = records.len().saturating_sub(FETCH_LIMIT);
    records[start..]
        .iter()
        .filter_map(|rec| {
            let date = rec.get(0).filter(|d| !d.is_empty())?;
            let price = http::parse_decimal(rec.get(1)?)?;
            Some(RawObservation::new(date, price.round_dp(2)))
        })
        .collect()
}

#[async_trait]
impl PriceSource for FreeGoldSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::FreeGold
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        match params {
            SourceParams::FreeGold { data_type } => self.fetch_csv(data_type).await,
            other => Err(BenchError::InvalidArg(format!(
                "FREEGOLD cannot serve {} params",
                other.kind()
            ))),
        }
    }
}

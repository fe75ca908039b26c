use std::collections::BTreeMap;

use async_trait::async_trait;
use benchwatch_core::{BenchError, PriceSource, RawObservation, SourceKind, SourceParams};
use serde::Deserialize;
use serde_json::Value;

use crate::FETCH_LIMIT;
use crate::http;

pub(crate) const API_KEY_VAR: &str = "EIA_API_KEY";
const NAME: &str = "EIA";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    data: Vec<EiaRow>,
}

#[derive(Debug, Deserialize)]
struct EiaRow {
    period: Option<String>,
    #[serde(default)]
    value: Value,
}

/// EIA reports values as numbers on some routes and numeric strings on others.
fn value_to_decimal(v: &Value) -> Option<rust_decimal::Decimal> {
    match v {
        Value::Number(n) => http::parse_decimal(&n.to_string()),
        Value::String(s) => http::parse_decimal(s),
        _ => None,
    }
}

/// U.S. Energy Information Administration API v2.
///
/// The endpoint URL and facet filters come from the catalog entry; only the
/// API key and an optional host override live on the source.
#[derive(Debug, Clone)]
pub struct EiaSource {
    client: reqwest::Client,
    api_key: Option<String>,
    base_override: Option<String>,
}

impl EiaSource {
    /// Source using the URLs from the catalog as-is.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http::client(),
            api_key,
            base_override: None,
        }
    }

    /// Replace scheme, host, and port of every catalog URL with `url`,
    /// keeping the path.
    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_override = Some(http::base_url(url));
        self
    }

    fn endpoint(&self, url: &str) -> Result<String, BenchError> {
        let Some(base) = &self.base_override else {
            return Ok(url.to_string());
        };
        let parsed = url::Url::parse(url)
            .map_err(|e| BenchError::InvalidArg(format!("bad EIA url '{url}': {e}")))?;
        Ok(format!("{base}{}", parsed.path()))
    }

    async fn fetch_series(
        &self,
        url: &str,
        facets: &BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<RawObservation>, BenchError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(BenchError::missing_credential(NAME, API_KEY_VAR));
        };
        let length = FETCH_LIMIT.to_string();
        let mut query: Vec<(String, &str)> = vec![
            ("api_key".into(), key),
            ("frequency".into(), "daily"),
            ("data[]".into(), "value"),
            ("length".into(), length.as_str()),
            ("sort[0][column]".into(), "period"),
            ("sort[0][direction]".into(), "desc"),
        ];
        for (facet, values) in facets {
            for v in values {
                query.push((format!("facets[{facet}][]"), v.as_str()));
            }
        }

        let req = self.client.get(self.endpoint(url)?).query(&query);
        let body: Envelope = http::json(req, NAME).await?;

        let mut rows: Vec<RawObservation> = body
            .response
            .map(|p| p.data)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|row| {
                let price = value_to_decimal(&row.value)?;
                Some(RawObservation::new(row.period?, price.round_dp(4)))
            })
            .collect();
        rows.reverse();

        if rows.is_empty() {
            let series = facets
                .get("series")
                .map(|s| s.join(","))
                .unwrap_or_default();
            return Err(BenchError::no_data(format!("EIA series {series}")));
        }
        Ok(rows)
    }
}

#[async_trait]
impl PriceSource for EiaSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Eia
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        match params {
            SourceParams::Eia { url, facets } => self.fetch_series(url, facets).await,
            other => Err(BenchError::InvalidArg(format!(
                "EIA cannot serve {} params",
                other.kind()
            ))),
        }
    }
}

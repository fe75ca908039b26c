use std::str::FromStr;

use benchwatch_core::BenchError;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;

/// User agent sent with every upstream request.
pub const USER_AGENT: &str = "BenchmarkWatcher/2.0";

pub(crate) fn client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default HTTP client");
            Client::new()
        })
}

/// Send `req` and fail on transport errors and non-2xx statuses.
pub(crate) async fn send(req: RequestBuilder, source: &str) -> Result<Response, BenchError> {
    let resp = req
        .send()
        .await
        .map_err(|e| BenchError::fetch(source, e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(BenchError::fetch(source, format!("HTTP {status}")));
    }
    Ok(resp)
}

pub(crate) async fn json<T: serde::de::DeserializeOwned>(
    req: RequestBuilder,
    source: &str,
) -> Result<T, BenchError> {
    send(req, source)
        .await?
        .json::<T>()
        .await
        .map_err(|e| BenchError::fetch(source, format!("malformed payload: {e}")))
}

pub(crate) async fn text(req: RequestBuilder, source: &str) -> Result<String, BenchError> {
    send(req, source)
        .await?
        .text()
        .await
        .map_err(|e| BenchError::fetch(source, e.to_string()))
}

/// Parse a decimal in plain or scientific notation.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

pub(crate) fn base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_string()
}

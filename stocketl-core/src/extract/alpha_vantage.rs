//! Alpha Vantage data provider.
//!
//! Fetches the complete daily history for a symbol from the
//! `TIME_SERIES_DAILY` endpoint with `outputsize=full`. One request per
//! symbol, no retries: an error payload surfaces as `DataUnavailable`.
//!
//! Alpha Vantage answers most failures (bad symbol, quota, bad key) with
//! HTTP 200 and a JSON body that simply lacks the time-series key, so the
//! body shape is the only reliable success check.

use super::provider::{validate_symbol, ExtractError, SeriesProvider};
use crate::domain::{RawRecord, RawSeries};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Key holding the date → OHLCV mapping in a successful response.
pub const TIME_SERIES_KEY: &str = "Time Series (Daily)";

/// Keys Alpha Vantage uses for error and throttling messages.
const MESSAGE_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

/// Alpha Vantage provider. The API key is owned by the provider for the
/// lifetime of one pipeline run.
pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stocketl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExtractError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Query parameters for a full daily series request.
    fn query<'a>(&'a self, symbol: &'a str) -> [(&'static str, &'a str); 4] {
        [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", "full"),
            ("apikey", self.api_key.as_str()),
        ]
    }
}

impl SeriesProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn fetch(&self, symbol: &str) -> Result<RawSeries, ExtractError> {
        validate_symbol(symbol)?;
        debug!(base_url = %self.base_url, symbol, "requesting TIME_SERIES_DAILY (full)");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&self.query(symbol))
            .send()
            .map_err(|e| ExtractError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ExtractError::Network(format!("failed to read response body: {e}")))?;

        let body = check_status(symbol, status, body)?;
        let series = parse_daily_payload(symbol, &body)?;
        info!(symbol, rows = series.len(), "extracted raw daily series");
        Ok(series)
    }
}

/// Non-2xx responses become `DataUnavailable` carrying the body verbatim.
fn check_status(symbol: &str, status: StatusCode, body: String) -> Result<String, ExtractError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(ExtractError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: format!("HTTP {status}"),
            payload: body,
        })
    }
}

/// Parse a `TIME_SERIES_DAILY` response body into a raw series.
///
/// Values are kept as text. JSON numbers (not produced by Alpha Vantage,
/// but accepted from compatible feeds) keep their literal representation.
pub fn parse_daily_payload(symbol: &str, body: &str) -> Result<RawSeries, ExtractError> {
    let unavailable = |reason: String| ExtractError::DataUnavailable {
        symbol: symbol.to_string(),
        reason,
        payload: body.to_string(),
    };

    let json: Value =
        serde_json::from_str(body).map_err(|e| unavailable(format!("response is not JSON: {e}")))?;

    let series = match json.get(TIME_SERIES_KEY) {
        Some(series) => series,
        None => return Err(unavailable(provider_message(&json))),
    };

    let days = series
        .as_object()
        .ok_or_else(|| unavailable(format!("'{TIME_SERIES_KEY}' is not an object")))?;
    if days.is_empty() {
        return Err(unavailable("empty time series".to_string()));
    }

    let mut records = Vec::with_capacity(days.len());
    for (date, fields) in days {
        let fields = fields
            .as_object()
            .ok_or_else(|| unavailable(format!("entry for {date} is not an object")))?;

        let mut record = RawRecord::new(date.as_str());
        for (label, value) in fields {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(unavailable(format!(
                        "field '{label}' on {date} has unexpected value {other}"
                    )))
                }
            };
            record.fields.insert(label.clone(), text);
        }
        records.push(record);
    }

    Ok(RawSeries::new(symbol, records))
}

/// Best explanation the payload offers for a missing time series.
fn provider_message(json: &Value) -> String {
    MESSAGE_KEYS
        .iter()
        .find_map(|key| json.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("missing '{TIME_SERIES_KEY}'"))
}

//! Series provider trait and structured extraction errors.
//!
//! The `SeriesProvider` trait abstracts over data sources (Alpha Vantage,
//! synthetic) so the pipeline can be driven offline and mocked in tests.

use crate::domain::RawSeries;
use thiserror::Error;

/// Longest ticker accepted before any request is made.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Errors raised while obtaining the raw series.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The response did not carry the expected time-series object. Covers
    /// invalid symbols, exhausted quotas and provider error payloads.
    #[error("data unavailable for '{symbol}': {reason}; response: {payload}")]
    DataUnavailable {
        symbol: String,
        reason: String,
        payload: String,
    },

    #[error("invalid symbol '{0}': expected 1-10 alphanumeric characters")]
    InvalidSymbol(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ExtractError {
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, ExtractError::DataUnavailable { .. })
    }
}

/// A source of raw daily series.
///
/// One call returns the complete available history for a symbol. There is
/// no date range: providers always fetch everything.
pub trait SeriesProvider {
    /// Human-readable name of this provider, recorded in load metadata.
    fn name(&self) -> &str;

    /// Fetch the full raw daily series for `symbol`.
    fn fetch(&self, symbol: &str) -> Result<RawSeries, ExtractError>;
}

/// Check a ticker before it is sent anywhere.
///
/// Accepts ASCII alphanumerics plus `.` and `-` (e.g. `BRK.B`, `RDS-A`).
pub fn validate_symbol(symbol: &str) -> Result<(), ExtractError> {
    let ok = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && symbol.chars().any(|c| c.is_ascii_alphanumeric());
    if ok {
        Ok(())
    } else {
        Err(ExtractError::InvalidSymbol(symbol.to_string()))
    }
}

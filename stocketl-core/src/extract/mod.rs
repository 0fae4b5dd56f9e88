//! Extraction: fetch raw daily series from a provider

pub mod alpha_vantage;
pub mod provider;
pub mod synthetic;

pub use alpha_vantage::{parse_daily_payload, AlphaVantageProvider, DEFAULT_BASE_URL};
pub use provider::{validate_symbol, ExtractError, SeriesProvider};
pub use synthetic::SyntheticProvider;

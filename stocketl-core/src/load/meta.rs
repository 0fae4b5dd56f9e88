//! Metadata sidecar written next to each processed CSV.

use crate::domain::EnrichedSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Describes one write of `{symbol}_daily.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadMeta {
    pub symbol: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub row_count: usize,
    /// BLAKE3 of the CSV bytes as written.
    pub data_hash: String,
    /// Provider that produced the raw series.
    pub source: String,
    pub written_at: chrono::NaiveDateTime,
}

impl LoadMeta {
    pub fn describe(series: &EnrichedSeries, csv_bytes: &[u8], source: &str) -> Self {
        Self {
            symbol: series.symbol.clone(),
            start_date: series.first_date(),
            end_date: series.last_date(),
            row_count: series.len(),
            data_hash: blake3::hash(csv_bytes).to_hex().to_string(),
            source: source.to_string(),
            written_at: chrono::Local::now().naive_local(),
        }
    }

    /// True if `csv_bytes` are exactly what this sidecar describes.
    pub fn matches(&self, csv_bytes: &[u8]) -> bool {
        blake3::hash(csv_bytes).to_hex().as_str() == self.data_hash
    }
}

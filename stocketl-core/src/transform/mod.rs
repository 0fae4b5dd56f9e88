//! Transformation: raw text table → typed, sorted, enriched series.
//!
//! Steps, in order:
//! 1. parse dates
//! 2. coerce every other field to `f64` (non-numeric → error)
//! 3. map provider labels (`"1. open"` ...) to canonical OHLCV columns
//! 4. sort ascending by date, applying the duplicate-date policy
//! 5. derive daily return, 7-day volatility, 20/50-day means, day type
//!
//! Derived columns are window-based, so sorting must happen first.

pub mod rolling;

use crate::domain::{DailyRecord, DayType, EnrichedRecord, EnrichedSeries, RawRecord, RawSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

pub use rolling::{pct_change, rolling_mean, rolling_sample_std};

/// Window for the rolling volatility of daily returns.
pub const VOLATILITY_WINDOW: usize = 7;
/// Short moving-average window.
pub const SHORT_MEAN_WINDOW: usize = 20;
/// Long moving-average window.
pub const LONG_MEAN_WINDOW: usize = 50;

/// Canonical OHLCV column names, in output order.
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Provider label → canonical column.
const LABEL_MAP: [(&str, &str); 5] = [
    ("1. open", "open"),
    ("2. high", "high"),
    ("3. low", "low"),
    ("4. close", "close"),
    ("5. volume", "volume"),
];

/// Errors raised on raw rows that do not match the expected shape.
///
/// Every variant is a malformed-record failure; they differ only in which
/// assumption the row broke.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("malformed record: unparseable date '{date}'")]
    InvalidDate { date: String },

    #[error("malformed record on {date}: column '{column}' value '{value}' {reason}")]
    MalformedRecord {
        date: String,
        column: String,
        value: String,
        reason: String,
    },

    #[error("malformed record on {date}: missing required column '{column}'")]
    MissingColumn { date: String, column: String },

    #[error("malformed record: duplicate date {date}")]
    DuplicateDate { date: NaiveDate },
}

impl TransformError {
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            TransformError::InvalidDate { .. }
                | TransformError::MalformedRecord { .. }
                | TransformError::MissingColumn { .. }
                | TransformError::DuplicateDate { .. }
        )
    }
}

/// What to do when the raw feed repeats a date.
///
/// "First" and "last" refer to the order rows arrived in the raw table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    KeepFirst,
    KeepLast,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuplicatePolicy::Reject => "reject",
            DuplicatePolicy::KeepFirst => "keep_first",
            DuplicatePolicy::KeepLast => "keep_last",
        })
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "keep_first" => Ok(DuplicatePolicy::KeepFirst),
            "keep_last" => Ok(DuplicatePolicy::KeepLast),
            _ => Err(format!(
                "unknown duplicate policy '{s}'. Valid: reject, keep-first, keep-last"
            )),
        }
    }
}

/// Transform a raw series into an enriched, date-sorted series.
///
/// An empty raw series yields an empty enriched series.
pub fn transform(raw: RawSeries, policy: DuplicatePolicy) -> Result<EnrichedSeries, TransformError> {
    let RawSeries { symbol, records } = raw;

    let typed = records
        .iter()
        .map(parse_record)
        .collect::<Result<Vec<_>, _>>()?;
    let sorted = sort_by_date(typed, policy)?;
    let enriched = enrich(&sorted);

    info!(
        symbol = %symbol,
        rows = enriched.len(),
        first = ?enriched.first().map(|r| r.date()),
        last = ?enriched.last().map(|r| r.date()),
        "transformed daily series"
    );

    Ok(EnrichedSeries {
        symbol,
        records: enriched,
    })
}

/// Parse a date as the feed writes it. A trailing time component is
/// accepted and dropped.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .ok()
}

/// Steps 1-3 for a single row.
fn parse_record(raw: &RawRecord) -> Result<DailyRecord, TransformError> {
    let date = parse_date(&raw.date).ok_or_else(|| TransformError::InvalidDate {
        date: raw.date.clone(),
    })?;

    let malformed = |column: &str, value: &str, reason: &str| TransformError::MalformedRecord {
        date: raw.date.clone(),
        column: column.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut ohlcv = [None; 5];
    for (label, text) in &raw.fields {
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| malformed(label, text, "is not numeric"))?;
        if !value.is_finite() {
            return Err(malformed(label, text, "is not finite"));
        }

        let Some(slot) = canonical_index(label) else {
            continue;
        };
        if value < 0.0 {
            return Err(malformed(label, text, "is negative"));
        }
        ohlcv[slot] = Some(value);
    }

    let mut values = [0.0; 5];
    for (slot, value) in ohlcv.iter().enumerate() {
        values[slot] = value.ok_or_else(|| TransformError::MissingColumn {
            date: raw.date.clone(),
            column: OHLCV_COLUMNS[slot].to_string(),
        })?;
    }
    let [open, high, low, close, volume] = values;

    Ok(DailyRecord {
        date,
        open,
        high,
        low,
        close,
        volume,
    })
}

/// Position of a raw label in `OHLCV_COLUMNS`. Both provider labels and
/// canonical names are recognised.
fn canonical_index(label: &str) -> Option<usize> {
    let canonical = LABEL_MAP
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(label);
    OHLCV_COLUMNS.iter().position(|c| *c == canonical)
}

/// Step 4: stable sort, then resolve repeated dates.
fn sort_by_date(
    mut records: Vec<DailyRecord>,
    policy: DuplicatePolicy,
) -> Result<Vec<DailyRecord>, TransformError> {
    records.sort_by_key(|r| r.date);

    match policy {
        DuplicatePolicy::Reject => {
            if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
                return Err(TransformError::DuplicateDate { date: pair[0].date });
            }
        }
        DuplicatePolicy::KeepFirst => records.dedup_by_key(|r| r.date),
        DuplicatePolicy::KeepLast => {
            let mut kept: Vec<DailyRecord> = Vec::with_capacity(records.len());
            for rec in records {
                match kept.last_mut() {
                    Some(last) if last.date == rec.date => *last = rec,
                    _ => kept.push(rec),
                }
            }
            return Ok(kept);
        }
    }
    Ok(records)
}

/// Step 5: derive the analytics columns for a date-sorted series.
pub fn enrich(records: &[DailyRecord]) -> Vec<EnrichedRecord> {
    let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    let returns = pct_change(&closes);
    let volatility = rolling_sample_std(&returns, VOLATILITY_WINDOW);
    let mean_short = rolling_mean(&closes, SHORT_MEAN_WINDOW);
    let mean_long = rolling_mean(&closes, LONG_MEAN_WINDOW);

    records
        .iter()
        .enumerate()
        .map(|(i, record)| EnrichedRecord {
            record: *record,
            daily_return: returns[i],
            volatility_7d: volatility[i],
            mean_20d: mean_short[i],
            mean_50d: mean_long[i],
            day_type: DayType::classify(returns[i]),
        })
        .collect()
}

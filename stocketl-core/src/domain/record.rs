//! Daily records: raw (as fetched) and enriched (typed, with analytics).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One trading day exactly as the provider returned it.
///
/// All values are text. Field labels are whatever the provider uses
/// (Alpha Vantage prefixes them: `"1. open"`, `"4. close"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(label.into(), value.into());
        self
    }
}

/// Raw table for a single symbol. Row order is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSeries {
    pub symbol: String,
    pub records: Vec<RawRecord>,
}

impl RawSeries {
    pub fn new(symbol: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            symbol: symbol.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Typed OHLCV record for one trading day.
///
/// Volume is an integer count held as `f64` so every numeric column shares
/// one type, matching the CSV representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Classification of a day by its close-to-close return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Gain,
    Loss,
    Neutral,
}

impl DayType {
    /// Returns above this are gains.
    pub const GAIN_THRESHOLD: f64 = 0.01;
    /// Returns below this are losses.
    pub const LOSS_THRESHOLD: f64 = -0.01;

    /// Classify a daily return. Both comparisons are strict, and the gain
    /// check runs first. An undefined return is neutral.
    pub fn classify(daily_return: Option<f64>) -> Self {
        match daily_return {
            Some(r) if r > Self::GAIN_THRESHOLD => DayType::Gain,
            Some(r) if r < Self::LOSS_THRESHOLD => DayType::Loss,
            _ => DayType::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Gain => "gain",
            DayType::Loss => "loss",
            DayType::Neutral => "neutral",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown day type '{0}' (expected gain, loss or neutral)")]
pub struct ParseDayTypeError(pub String);

impl FromStr for DayType {
    type Err = ParseDayTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gain" => Ok(DayType::Gain),
            "loss" => Ok(DayType::Loss),
            "neutral" => Ok(DayType::Neutral),
            other => Err(ParseDayTypeError(other.to_string())),
        }
    }
}

/// A daily record with the derived analytics columns attached.
///
/// The derived fields depend on neighbouring records and are only
/// meaningful inside the sorted series that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: DailyRecord,
    /// `None` on the first row and when the previous close is zero, so a
    /// move off a zero close classifies as `Neutral`.
    pub daily_return: Option<f64>,
    pub volatility_7d: Option<f64>,
    pub mean_20d: Option<f64>,
    pub mean_50d: Option<f64>,
    pub day_type: DayType,
}

impl EnrichedRecord {
    pub fn date(&self) -> NaiveDate {
        self.record.date
    }

    pub fn close(&self) -> f64 {
        self.record.close
    }
}

/// Transformed series, sorted ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSeries {
    pub symbol: String,
    pub records: Vec<EnrichedRecord>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date())
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date())
    }

    /// Close prices in series order.
    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close()).collect()
    }

    /// Count of days per classification: (gain, loss, neutral).
    pub fn day_type_counts(&self) -> (usize, usize, usize) {
        self.records
            .iter()
            .fold((0, 0, 0), |(g, l, n), r| match r.day_type {
                DayType::Gain => (g + 1, l, n),
                DayType::Loss => (g, l + 1, n),
                DayType::Neutral => (g, l, n + 1),
            })
    }
}

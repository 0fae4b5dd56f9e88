//! Domain types for StockETL

pub mod record;

pub use record::{
    DailyRecord, DayType, EnrichedRecord, EnrichedSeries, ParseDayTypeError, RawRecord, RawSeries,
};

/// Ticker symbol used when none is given.
pub const DEFAULT_SYMBOL: &str = "AAPL";

//! Synthetic data provider for offline runs and tests.
//!
//! Produces a deterministic random walk from a starting price of 100.0,
//! seeded from the symbol name. Records are emitted newest-first with the
//! same text labels the Alpha Vantage payload uses, so the transformer
//! cannot tell the difference. These are clearly fake prices.

use super::provider::{validate_symbol, ExtractError, SeriesProvider};
use crate::domain::{RawRecord, RawSeries};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Synthetic provider producing `days` weekday records ending at `end`.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    end: NaiveDate,
    days: usize,
}

impl SyntheticProvider {
    pub fn new(end: NaiveDate, days: usize) -> Self {
        Self { end, days }
    }

    /// About two years of trading days ending today.
    pub fn ending_today() -> Self {
        Self::new(chrono::Local::now().date_naive(), 504)
    }

    fn generate(&self, symbol: &str) -> Vec<RawRecord> {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut dates = Vec::with_capacity(self.days);
        let mut current = self.end;
        while dates.len() < self.days {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                dates.push(current);
            }
            current -= Duration::days(1);
        }
        dates.reverse();

        let mut records = Vec::with_capacity(self.days);
        let mut price = 100.0_f64;
        for date in dates {
            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64);

            records.push(
                RawRecord::new(date.format("%Y-%m-%d").to_string())
                    .with_field("1. open", format!("{open:.4}"))
                    .with_field("2. high", format!("{high:.4}"))
                    .with_field("3. low", format!("{low:.4}"))
                    .with_field("4. close", format!("{close:.4}"))
                    .with_field("5. volume", volume.to_string()),
            );
            price = close;
        }

        // Alpha Vantage lists the most recent day first.
        records.reverse();
        records
    }
}

impl SeriesProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str) -> Result<RawSeries, ExtractError> {
        validate_symbol(symbol)?;
        Ok(RawSeries::new(symbol, self.generate(symbol)))
    }
}

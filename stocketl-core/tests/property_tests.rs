//! Property tests for transformer invariants.
//!
//! Uses proptest to verify:
//! 1. Output is sorted by date regardless of input order
//! 2. First return is None, the rest follow close[i]/close[i-1] - 1
//! 3. mean_20d is None during warm-up and the trailing mean afterwards
//! 4. day_type thresholds are strict
//! 5. Volatility is defined exactly from index 7 onwards
//! 6. CSV output reads back to the same records

use chrono::NaiveDate;
use proptest::prelude::*;
use stocketl_core::load::{read_records, to_csv_bytes};
use stocketl_core::transform::{SHORT_MEAN_WINDOW, VOLATILITY_WINDOW};
use stocketl_core::{transform, DayType, DuplicatePolicy, RawRecord, RawSeries};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        0..120,
    )
}

fn raw_series(closes: &[f64]) -> Vec<RawRecord> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let date = start + chrono::Duration::days(i as i64);
            let c = close.to_string();
            RawRecord::new(date.format("%Y-%m-%d").to_string())
                .with_field("1. open", c.clone())
                .with_field("2. high", c.clone())
                .with_field("3. low", c.clone())
                .with_field("4. close", c)
                .with_field("5. volume", "1000")
        })
        .collect()
}

fn arb_shuffled() -> impl Strategy<Value = (Vec<f64>, Vec<RawRecord>)> {
    arb_closes().prop_flat_map(|closes| {
        let records = raw_series(&closes);
        (Just(closes), Just(records).prop_shuffle())
    })
}

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

// ── 1-3. Ordering, returns, means ────────────────────────────────────

proptest! {
    #[test]
    fn output_is_sorted_whatever_the_input_order((closes, shuffled) in arb_shuffled()) {
        let series = transform(RawSeries::new("P", shuffled), DuplicatePolicy::Reject).unwrap();
        prop_assert_eq!(series.len(), closes.len());
        prop_assert!(series.records.windows(2).all(|w| w[0].date() < w[1].date()));
        prop_assert_eq!(series.closes(), closes);
    }

    #[test]
    fn returns_follow_close_ratio(closes in arb_closes()) {
        let series = transform(RawSeries::new("P", raw_series(&closes)), DuplicatePolicy::Reject).unwrap();
        for (i, r) in series.records.iter().enumerate() {
            if i == 0 {
                prop_assert!(r.daily_return.is_none());
            } else {
                let expected = closes[i] / closes[i - 1] - 1.0;
                prop_assert!(close_enough(r.daily_return.unwrap(), expected));
            }
        }
    }

    #[test]
    fn short_mean_has_warm_up(closes in arb_closes()) {
        let series = transform(RawSeries::new("P", raw_series(&closes)), DuplicatePolicy::Reject).unwrap();
        for (i, r) in series.records.iter().enumerate() {
            if i + 1 < SHORT_MEAN_WINDOW {
                prop_assert!(r.mean_20d.is_none());
            } else {
                let window = &closes[i + 1 - SHORT_MEAN_WINDOW..=i];
                let expected = window.iter().sum::<f64>() / SHORT_MEAN_WINDOW as f64;
                prop_assert!(close_enough(r.mean_20d.unwrap(), expected));
            }
        }
    }

    #[test]
    fn volatility_defined_from_index_seven(closes in arb_closes()) {
        let series = transform(RawSeries::new("P", raw_series(&closes)), DuplicatePolicy::Reject).unwrap();
        for (i, r) in series.records.iter().enumerate() {
            prop_assert_eq!(r.volatility_7d.is_some(), i >= VOLATILITY_WINDOW);
            if let Some(v) = r.volatility_7d {
                prop_assert!(v >= 0.0);
            }
        }
    }

    // ── 4. Day type thresholds ───────────────────────────────────────

    #[test]
    fn day_type_is_strict(ret in -0.05..0.05_f64) {
        let expected = if ret > 0.01 {
            DayType::Gain
        } else if ret < -0.01 {
            DayType::Loss
        } else {
            DayType::Neutral
        };
        prop_assert_eq!(DayType::classify(Some(ret)), expected);
    }

    // ── 6. CSV round-trip ────────────────────────────────────────────

    #[test]
    fn csv_reads_back_identically(closes in arb_closes()) {
        let series = transform(RawSeries::new("P", raw_series(&closes)), DuplicatePolicy::Reject).unwrap();
        let bytes = to_csv_bytes(&series.records).unwrap();
        let back = read_records(bytes.as_slice()).unwrap();
        prop_assert_eq!(back, series.records);
    }
}

#[test]
fn boundary_returns_are_neutral() {
    assert_eq!(DayType::classify(Some(0.01)), DayType::Neutral);
    assert_eq!(DayType::classify(Some(-0.01)), DayType::Neutral);
    assert_eq!(DayType::classify(None), DayType::Neutral);
}

//! Optional Parquet copy of a processed series.

use super::LoadError;
use crate::domain::EnrichedRecord;
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs;
use std::path::Path;

/// Convert enriched records to a Polars DataFrame with the CSV column set.
pub fn records_to_dataframe(records: &[EnrichedRecord]) -> Result<DataFrame, LoadError> {
    // NaiveDate's default is 1970-01-01.
    let epoch = NaiveDate::default();
    let dates: Vec<i32> = records
        .iter()
        .map(|r| (r.date() - epoch).num_days() as i32)
        .collect();

    let col = |f: fn(&EnrichedRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();
    let opt = |f: fn(&EnrichedRecord) -> Option<f64>| {
        records.iter().map(f).collect::<Vec<Option<f64>>>()
    };
    let day_types: Vec<&str> = records.iter().map(|r| r.day_type.as_str()).collect();

    DataFrame::new(vec![
        Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| LoadError::Parquet(format!("date cast: {e}")))?,
        Column::new("open".into(), col(|r| r.record.open)),
        Column::new("high".into(), col(|r| r.record.high)),
        Column::new("low".into(), col(|r| r.record.low)),
        Column::new("close".into(), col(|r| r.record.close)),
        Column::new("volume".into(), col(|r| r.record.volume)),
        Column::new("daily_return".into(), opt(|r| r.daily_return)),
        Column::new("volatility_7d".into(), opt(|r| r.volatility_7d)),
        Column::new("mean_20d".into(), opt(|r| r.mean_20d)),
        Column::new("mean_50d".into(), opt(|r| r.mean_50d)),
        Column::new("day_type".into(), day_types),
    ])
    .map_err(|e| LoadError::Parquet(format!("dataframe creation: {e}")))
}

/// Write records to a Parquet file (via `.tmp` then rename).
pub fn write_parquet(path: &Path, records: &[EnrichedRecord]) -> Result<(), LoadError> {
    let mut df = records_to_dataframe(records)?;
    let tmp_path = path.with_extension("parquet.tmp");

    let file = fs::File::create(&tmp_path).map_err(|e| LoadError::io(&tmp_path, e))?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| LoadError::Parquet(format!("write parquet: {e}")))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LoadError::io(path, e)
    })
}

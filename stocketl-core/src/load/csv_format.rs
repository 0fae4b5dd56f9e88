//! CSV layout of a processed series.
//!
//! One header row, then one row per trading day in date order. Undefined
//! analytics are empty fields. Floats use the shortest representation that
//! parses back to the same value.

use super::LoadError;
use crate::domain::{DailyRecord, DayType, EnrichedRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Header of every processed CSV, in column order.
pub const CSV_HEADER: [&str; 11] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "daily_return",
    "volatility_7d",
    "mean_20d",
    "mean_50d",
    "day_type",
];

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    daily_return: Option<f64>,
    volatility_7d: Option<f64>,
    mean_20d: Option<f64>,
    mean_50d: Option<f64>,
    day_type: DayType,
}

impl From<&EnrichedRecord> for CsvRow {
    fn from(r: &EnrichedRecord) -> Self {
        Self {
            date: r.record.date,
            open: r.record.open,
            high: r.record.high,
            low: r.record.low,
            close: r.record.close,
            volume: r.record.volume,
            daily_return: r.daily_return,
            volatility_7d: r.volatility_7d,
            mean_20d: r.mean_20d,
            mean_50d: r.mean_50d,
            day_type: r.day_type,
        }
    }
}

impl From<CsvRow> for EnrichedRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            record: DailyRecord {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            },
            daily_return: row.daily_return,
            volatility_7d: row.volatility_7d,
            mean_20d: row.mean_20d,
            mean_50d: row.mean_50d,
            day_type: row.day_type,
        }
    }
}

/// Write records as CSV. The header is written even for an empty series.
pub fn write_records<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<(), LoadError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render records to CSV bytes.
pub fn to_csv_bytes(records: &[EnrichedRecord]) -> Result<Vec<u8>, LoadError> {
    let mut buf = Vec::new();
    write_records(&mut buf, records)?;
    Ok(buf)
}

/// Parse a processed CSV. The header must match `CSV_HEADER` exactly.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<EnrichedRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let headers = rdr.headers()?.clone();
    if !headers.iter().eq(CSV_HEADER.iter().copied()) {
        return Err(LoadError::Header {
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    rdr.deserialize::<CsvRow>()
        .map(|row| row.map(EnrichedRecord::from).map_err(LoadError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, close: f64, ret: Option<f64>) -> EnrichedRecord {
        EnrichedRecord {
            record: DailyRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_500_000.0,
            },
            daily_return: ret,
            volatility_7d: None,
            mean_20d: None,
            mean_50d: None,
            day_type: DayType::classify(ret),
        }
    }

    #[test]
    fn header_and_nulls_as_empty_fields() {
        let bytes = to_csv_bytes(&[record(2, 100.0, None), record(3, 101.0, Some(0.01))]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[1].starts_with("2024-01-02,100"));
        assert!(lines[1].ends_with(",,,,,neutral"));
        assert!(lines[2].contains(",0.01,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_series_still_has_header() {
        let text = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), CSV_HEADER.join(","));
        assert!(read_records(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn reads_back_what_it_wrote() {
        let records = vec![
            record(2, 185.64, None),
            record(3, 184.25, Some(184.25 / 185.64 - 1.0)),
        ];
        let bytes = to_csv_bytes(&records).unwrap();
        assert_eq!(read_records(bytes.as_slice()).unwrap(), records);
    }

    #[test]
    fn wrong_header_is_rejected() {
        let csv = "date,close\n2024-01-02,1.0\n";
        assert!(matches!(
            read_records(csv.as_bytes()),
            Err(LoadError::Header { .. })
        ));
    }

    #[test]
    fn bad_day_type_is_csv_error() {
        let mut text = String::from_utf8(to_csv_bytes(&[record(2, 1.0, None)]).unwrap()).unwrap();
        text = text.replace("neutral", "flat");
        assert!(matches!(read_records(text.as_bytes()), Err(LoadError::Csv(_))));
    }
}

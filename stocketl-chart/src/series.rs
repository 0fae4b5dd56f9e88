//! Plot-ready views of an enriched series.

use chrono::NaiveDate;
use stocketl_core::EnrichedRecord;

/// One line on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Close,
    Mean20,
    Mean50,
}

impl SeriesKind {
    /// Drawing order: close first, means on top.
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Close, SeriesKind::Mean20, SeriesKind::Mean50];

    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Close => "Close Price",
            SeriesKind::Mean20 => "MEAN 20d",
            SeriesKind::Mean50 => "MEAN 50d",
        }
    }

    pub fn value(self, record: &EnrichedRecord) -> Option<f64> {
        match self {
            SeriesKind::Close => Some(record.close()),
            SeriesKind::Mean20 => record.mean_20d,
            SeriesKind::Mean50 => record.mean_50d,
        }
    }

    pub fn is_dashed(self) -> bool {
        !matches!(self, SeriesKind::Close)
    }
}

/// Axis extents over every plotted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Y range widened by `fraction` of its span on each side.
    ///
    /// A flat series is widened by 1.0 so the axis still has extent.
    pub fn padded_y(&self, fraction: f64) -> (f64, f64) {
        let span = self.y_max - self.y_min;
        let pad = if span > 0.0 { span * fraction } else { 1.0 };
        (self.y_min - pad, self.y_max + pad)
    }
}

/// Extents of `records`, or None when there is nothing to plot.
pub fn bounds(records: &[EnrichedRecord]) -> Option<Bounds> {
    let first = records.first()?.date();
    let last = records.last()?.date();

    let (y_min, y_max) = records
        .iter()
        .flat_map(|r| SeriesKind::ALL.into_iter().filter_map(|k| k.value(r)))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    Some(Bounds {
        first,
        last,
        y_min,
        y_max,
    })
}

/// Contiguous runs of defined values. An undefined value ends a run.
pub fn segments(records: &[EnrichedRecord], kind: SeriesKind) -> Vec<Vec<(NaiveDate, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for record in records {
        match kind.value(record) {
            Some(v) => current.push((record.date(), v)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn means_start_after_warm_up() {
        let s = test_data::synthetic(80);
        let close = segments(&s.records, SeriesKind::Close);
        let m20 = segments(&s.records, SeriesKind::Mean20);
        let m50 = segments(&s.records, SeriesKind::Mean50);

        assert_eq!(close.len(), 1);
        assert_eq!(close[0].len(), 80);
        assert_eq!(m20[0].len(), 61);
        assert_eq!(m50[0].len(), 31);
        assert_eq!(m50[0][0].0, s.records[49].date());
    }

    #[test]
    fn short_series_has_no_mean_segments() {
        let s = test_data::synthetic(10);
        assert!(segments(&s.records, SeriesKind::Mean20).is_empty());
    }

    #[test]
    fn bounds_cover_all_lines() {
        let s = test_data::synthetic(120);
        let b = bounds(&s.records).unwrap();
        assert_eq!(b.first, s.first_date().unwrap());
        assert_eq!(b.last, s.last_date().unwrap());
        for r in &s.records {
            for k in SeriesKind::ALL {
                if let Some(v) = k.value(r) {
                    assert!(v >= b.y_min && v <= b.y_max);
                }
            }
        }
        assert!(bounds(&[]).is_none());
    }

    #[test]
    fn flat_bounds_still_have_extent() {
        let b = Bounds {
            first: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            last: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            y_min: 5.0,
            y_max: 5.0,
        };
        assert_eq!(b.padded_y(0.05), (4.0, 6.0));
    }
}

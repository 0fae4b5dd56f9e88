//! SVG chart file via plotters.
//!
//! The parent directory of the output path must already exist.

use std::path::Path;

use chrono::Duration;
use plotters::prelude::*;
use stocketl_core::EnrichedSeries;
use tracing::info;

use crate::series::{bounds, segments, SeriesKind};
use crate::{theme, ChartError};

pub const CHART_TITLE: &str = "Closing Price and Moving Averages";

const SIZE: (u32, u32) = (1400, 700);

fn drawing(e: impl std::fmt::Display) -> ChartError {
    ChartError::Drawing(e.to_string())
}

/// Draw close, MEAN 20d and MEAN 50d against date into an SVG at `path`.
///
/// Undefined moving-average values are left as gaps.
pub fn render_chart(series: &EnrichedSeries, path: &Path) -> Result<(), ChartError> {
    let b = bounds(&series.records).ok_or_else(|| ChartError::EmptySeries {
        symbol: series.symbol.clone(),
    })?;
    let (y_min, y_max) = b.padded_y(0.05);
    let x_range = b.first..b.last + Duration::days(1);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_min..y_max)
        .map_err(drawing)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price")
        .x_labels(10)
        .y_labels(10)
        .light_line_style(RGBColor(235, 235, 235))
        .draw()
        .map_err(drawing)?;

    for kind in SeriesKind::ALL {
        let (r, g, bl) = theme::rgb(kind);
        let color = RGBColor(r, g, bl);
        let style = color.stroke_width(2);

        for (i, points) in segments(&series.records, kind).into_iter().enumerate() {
            let anno = if kind.is_dashed() {
                chart
                    .draw_series(DashedLineSeries::new(points, 10, 6, style))
                    .map_err(drawing)?
            } else {
                chart
                    .draw_series(LineSeries::new(points, style))
                    .map_err(drawing)?
            };
            if i == 0 {
                anno.label(kind.label()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(drawing)?;

    root.present().map_err(drawing)?;

    info!(
        symbol = %series.symbol,
        rows = series.len(),
        path = %path.display(),
        "chart written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_data;

    #[test]
    fn writes_svg_with_title_and_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closing_price_chart.svg");
        render_chart(&test_data::synthetic(120), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(CHART_TITLE));
        assert!(svg.contains("Close Price"));
        assert!(svg.contains("MEAN 20d"));
        assert!(svg.contains("MEAN 50d"));
    }

    #[test]
    fn short_series_renders_close_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.svg");
        render_chart(&test_data::synthetic(5), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Close Price"));
        assert!(!svg.contains("MEAN 20d"));
    }

    #[test]
    fn empty_series_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let series = EnrichedSeries {
            symbol: "NONE".into(),
            records: vec![],
        };
        let err = render_chart(&series, &dir.path().join("x.svg")).unwrap_err();
        assert!(matches!(err, ChartError::EmptySeries { .. }));
        assert!(!dir.path().join("x.svg").exists());
    }

    #[test]
    fn missing_directory_is_a_drawing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/chart.svg");
        let err = render_chart(&test_data::synthetic(30), &path).unwrap_err();
        assert!(matches!(err, ChartError::Drawing(_)));
    }
}

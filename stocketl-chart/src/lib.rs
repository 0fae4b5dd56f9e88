//! StockETL Chart: closing price and moving averages.
//!
//! Two outputs from the same in-memory series:
//! - `render_chart()`: SVG file with close, MEAN 20d and MEAN 50d lines
//! - `display_interactive()`: ratatui viewer with switchable date range

pub mod series;
pub mod svg;
pub mod theme;
pub mod viewer;

use thiserror::Error;

pub use series::{bounds, segments, Bounds, SeriesKind};
pub use svg::{render_chart, CHART_TITLE};
pub use viewer::{display_interactive, ChartView, ViewRange};

/// Errors from chart rendering.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("series '{symbol}' has no records to chart")]
    EmptySeries { symbol: String },
    #[error("drawing error: {0}")]
    Drawing(String),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

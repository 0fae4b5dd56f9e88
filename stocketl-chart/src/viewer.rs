//! Interactive terminal chart.
//!
//! Keys: `q`/`Esc` quit, `a` all history, `1` last year, `5` last five years.

use std::io::{self, stdout, IsTerminal};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph};
use ratatui::{Frame, Terminal};
use stocketl_core::{EnrichedRecord, EnrichedSeries};
use tracing::warn;

use crate::series::{bounds, SeriesKind};
use crate::svg::CHART_TITLE;
use crate::{theme, ChartError};

/// Trading days per year.
const YEAR: usize = 252;

/// How much history the viewer shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewRange {
    #[default]
    All,
    OneYear,
    FiveYears,
}

impl ViewRange {
    /// Trailing record count, or None for everything.
    pub fn max_records(self) -> Option<usize> {
        match self {
            ViewRange::All => None,
            ViewRange::OneYear => Some(YEAR),
            ViewRange::FiveYears => Some(5 * YEAR),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewRange::All => "All",
            ViewRange::OneYear => "1Y",
            ViewRange::FiveYears => "5Y",
        }
    }
}

/// Viewer state over a borrowed series.
#[derive(Debug)]
pub struct ChartView<'a> {
    series: &'a EnrichedSeries,
    range: ViewRange,
    running: bool,
}

impl<'a> ChartView<'a> {
    pub fn new(series: &'a EnrichedSeries) -> Self {
        Self {
            series,
            range: ViewRange::default(),
            running: true,
        }
    }

    pub fn range(&self) -> ViewRange {
        self.range
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Records inside the current range.
    pub fn visible(&self) -> &'a [EnrichedRecord] {
        let records = self.series.records.as_slice();
        match self.range.max_records() {
            Some(n) if records.len() > n => &records[records.len() - n..],
            _ => records,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only handle key press events (Windows sends both Press and Release).
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('a') => self.range = ViewRange::All,
            KeyCode::Char('1') => self.range = ViewRange::OneYear,
            KeyCode::Char('5') => self.range = ViewRange::FiveYears,
            _ => {}
        }
    }
}

/// Render one frame of the viewer.
pub fn draw(f: &mut Frame, view: &ChartView) {
    let [chart_area, help_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(f.area());

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "q/Esc quit | a all | 1 last year | 5 last 5 years",
            Style::default().fg(theme::MUTED),
        ))),
        help_area,
    );

    let records = view.visible();
    let title = format!(
        " {} | {} | {} ",
        CHART_TITLE,
        view.series.symbol,
        view.range().label()
    );
    let block = Block::bordered().title(title);

    let Some(b) = bounds(records) else {
        f.render_widget(Paragraph::new("No data to display.").block(block), chart_area);
        return;
    };
    let (y_min, y_max) = b.padded_y(0.05);
    let x_max = ((b.last - b.first).num_days() as f64).max(1.0);

    let data: Vec<(SeriesKind, Vec<(f64, f64)>)> = SeriesKind::ALL
        .into_iter()
        .map(|kind| {
            let points = records
                .iter()
                .filter_map(|r| {
                    kind.value(r)
                        .map(|v| ((r.date() - b.first).num_days() as f64, v))
                })
                .collect();
            (kind, points)
        })
        .collect();

    let datasets: Vec<Dataset> = data
        .iter()
        .filter(|(_, points)| !points.is_empty())
        .map(|(kind, points)| {
            Dataset::default()
                .name(kind.label())
                .marker(if kind.is_dashed() {
                    symbols::Marker::Dot
                } else {
                    symbols::Marker::Braille
                })
                .style(Style::default().fg(theme::terminal(*kind)))
                .graph_type(GraphType::Line)
                .data(points)
        })
        .collect();

    let muted = Style::default().fg(theme::MUTED);
    let mid = b.first + chrono::Duration::days((x_max / 2.0) as i64);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", muted))
                .style(muted)
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled(b.first.to_string(), muted),
                    Span::styled(mid.to_string(), muted),
                    Span::styled(b.last.to_string(), muted),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", muted))
                .style(muted)
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.2}"), muted),
                    Span::styled(format!("{y_max:.2}"), muted),
                ]),
        );

    f.render_widget(chart, chart_area);
}

/// Show the series in the terminal until the user quits.
///
/// Skipped with a warning when stdout is not a terminal. Failures are
/// logged, never returned.
pub fn display_interactive(series: &EnrichedSeries) {
    if !stdout().is_terminal() {
        warn!(symbol = %series.symbol, "stdout is not a terminal; skipping interactive chart");
        return;
    }
    if let Err(e) = run(series) {
        warn!(symbol = %series.symbol, error = %e, "interactive chart failed");
    }
}

fn run(series: &EnrichedSeries) -> Result<(), ChartError> {
    if series.is_empty() {
        return Err(ChartError::EmptySeries {
            symbol: series.symbol.clone(),
        });
    }

    enable_raw_mode()?;
    let mut out = stdout();
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let result = Terminal::new(CrosstermBackend::new(out))
        .and_then(|mut terminal| event_loop(&mut terminal, series));

    // Restore the terminal whatever happened in the loop.
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    result.map_err(ChartError::from)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    series: &EnrichedSeries,
) -> io::Result<()> {
    let mut view = ChartView::new(series);
    terminal.clear()?;
    while view.is_running() {
        terminal.draw(|f| draw(f, &view))?;
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                view.handle_key(key);
            }
        }
    }
    terminal.show_cursor()
}

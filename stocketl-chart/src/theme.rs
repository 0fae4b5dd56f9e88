//! Colors for the three chart lines, shared by the SVG and terminal output.

use crate::series::SeriesKind;
use ratatui::style::Color;

/// Muted gray for axes, labels and hints in the terminal viewer.
pub const MUTED: Color = Color::Rgb(100, 100, 110);

/// RGB for the SVG output.
pub fn rgb(kind: SeriesKind) -> (u8, u8, u8) {
    match kind {
        SeriesKind::Close => (0, 0, 255),
        SeriesKind::Mean20 => (255, 0, 0),
        SeriesKind::Mean50 => (0, 128, 0),
    }
}

/// Terminal color for the viewer.
pub fn terminal(kind: SeriesKind) -> Color {
    match kind {
        SeriesKind::Close => Color::Blue,
        SeriesKind::Mean20 => Color::Red,
        SeriesKind::Mean50 => Color::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_blue_means_red_and_green() {
        assert_eq!(rgb(SeriesKind::Close), (0, 0, 255));
        assert_eq!(terminal(SeriesKind::Mean20), Color::Red);
        assert_eq!(terminal(SeriesKind::Mean50), Color::Green);
    }
}

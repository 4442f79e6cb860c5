//! Device presence dot: ● online, ○ offline.

use ratatui::style::Style;
use ratatui::text::Span;

use pwmon_core::Presence;

use crate::theme;

pub fn status_span(presence: Presence) -> Span<'static> {
    let (symbol, color) = match presence {
        Presence::Online => ("●", theme::SUCCESS_GREEN),
        Presence::Offline => ("○", theme::ERROR_RED),
    };
    Span::styled(format!("{symbol} {presence}"), Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_and_label() {
        assert_eq!(status_span(Presence::Online).content, "● online");
        assert_eq!(status_span(Presence::Offline).content, "○ offline");
        assert_eq!(
            status_span(Presence::Offline).style.fg,
            Some(theme::ERROR_RED)
        );
    }
}

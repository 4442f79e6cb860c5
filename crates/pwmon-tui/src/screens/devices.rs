//! Devices screen: one card per roster entry, laid out in a grid.
//!
//! The cursor is local to the screen; Enter or a click turns it into the
//! engine's selection. Cards age their "last seen" label on every tick.

use std::cell::Cell;
use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use pwmon_core::{DEFAULT_DEVICE, DeviceCard, DeviceGrid, DeviceSummary};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator::status_span;

const CARD_WIDTH: u16 = 34;
const CARD_HEIGHT: u16 = 7;

pub struct DevicesScreen {
    focused: bool,
    roster: Arc<Vec<DeviceSummary>>,
    selected: String,
    /// Clock used for presence and ages, advanced on `Tick`.
    now: i64,
    grid: DeviceGrid,
    cursor: usize,
    /// Last render area, for mouse hit-testing.
    last_area: Cell<Rect>,
}

impl DevicesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            roster: Arc::default(),
            selected: DEFAULT_DEVICE.to_owned(),
            now: Utc::now().timestamp(),
            grid: DeviceGrid::default(),
            cursor: 0,
            last_area: Cell::new(Rect::default()),
        }
    }

    fn rebuild(&mut self) {
        self.grid = DeviceGrid::build(&self.roster, &self.selected, self.now);
        self.cursor = self.cursor.min(self.grid.len().saturating_sub(1));
    }

    fn move_cursor(&mut self, forward: bool) {
        if self.grid.is_empty() {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1).min(self.grid.len() - 1)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    fn select_at_cursor(&self) -> Option<Action> {
        self.grid
            .cards
            .get(self.cursor)
            .map(|card| Action::SelectDevice(card.key.clone()))
    }

    fn render_card(frame: &mut Frame, area: Rect, card: &DeviceCard, under_cursor: bool) {
        let border = if card.selected {
            theme::border_focused().add_modifier(Modifier::BOLD)
        } else {
            theme::border_default()
        };
        let title = if card.selected {
            format!(" ▸ {} ", card.title)
        } else {
            format!(" {} ", card.title)
        };

        let mut block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        if under_cursor {
            block = block.style(Style::default().bg(theme::BG_HIGHLIGHT));
        }

        let mut lines = vec![
            Line::from(status_span(card.presence)),
            Line::from(Span::styled(card.meta.as_str(), theme::key_hint())),
        ];
        lines.extend(card.metrics.iter().map(|m| {
            let scope = m.scope.to_string();
            Line::from(vec![
                Span::styled(format!("{scope:<7}"), theme::text()),
                Span::styled(m.value.as_str(), theme::counter_value()),
            ])
        }));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Visible cards as `(index, rect)`, scrolled so the cursor row is shown.
fn card_rects(area: Rect, count: usize, cursor: usize) -> Vec<(usize, Rect)> {
    let cols = usize::from(area.width / CARD_WIDTH).max(1);
    let visible_rows = usize::from(area.height / CARD_HEIGHT).max(1);
    let first_row = (cursor / cols).saturating_sub(visible_rows - 1);
    let width = CARD_WIDTH.min(area.width);
    let height = CARD_HEIGHT.min(area.height);

    (0..count)
        .filter_map(|i| {
            let row = (i / cols).checked_sub(first_row)?;
            if row >= visible_rows {
                return None;
            }
            let col = u16::try_from(i % cols).ok()?;
            let row = u16::try_from(row).ok()?;
            Some((
                i,
                Rect::new(
                    area.x + col * CARD_WIDTH,
                    area.y + row * CARD_HEIGHT,
                    width,
                    height,
                ),
            ))
        })
        .collect()
}

fn inner_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

impl Component for DevicesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j' | 'l') | KeyCode::Down | KeyCode::Right => self.move_cursor(true),
            KeyCode::Char('k' | 'h') | KeyCode::Up | KeyCode::Left => self.move_cursor(false),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.cursor = self.grid.len().saturating_sub(1);
            }
            KeyCode::Enter => return Ok(self.select_at_cursor()),
            _ => {}
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return Ok(None);
        };

        let inner = inner_area(self.last_area.get());
        let hit = card_rects(inner, self.grid.len(), self.cursor)
            .into_iter()
            .find(|(_, rect)| rect.contains(Position::new(mouse.column, mouse.row)));

        match hit {
            Some((index, _)) => {
                self.cursor = index;
                Ok(self.select_at_cursor())
            }
            None => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RosterUpdated(roster) => {
                self.roster = Arc::clone(roster);
                self.rebuild();
            }
            Action::SelectionChanged(key) => {
                self.selected.clone_from(key);
                self.rebuild();
                if let Some(index) = self.grid.selected_index() {
                    self.cursor = index;
                }
            }
            Action::Tick => {
                let now = Utc::now().timestamp();
                if now != self.now {
                    self.now = now;
                    self.rebuild();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.last_area.set(area);

        let block = Block::default()
            .title(format!(
                " Devices ({}/{} online) ",
                self.grid.online_count(),
                self.grid.len()
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.grid.is_empty() {
            frame.render_widget(
                Paragraph::new("No devices have reported yet")
                    .alignment(Alignment::Center)
                    .style(theme::key_hint()),
                inner,
            );
            return;
        }

        for (index, rect) in card_rects(inner, self.grid.len(), self.cursor) {
            if let Some(card) = self.grid.cards.get(index) {
                Self::render_card(frame, rect, card, index == self.cursor);
            }
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::testing::buffer_text;

    const NOW: i64 = 1_700_000_000;

    fn device(key: &str, received_at: i64) -> DeviceSummary {
        DeviceSummary {
            key: key.into(),
            device: Some(format!("{key}-name")),
            ip: Some("10.0.0.1".into()),
            total_bytes: 2048,
            received_at,
            ..DeviceSummary::default()
        }
    }

    fn screen_with(roster: Vec<DeviceSummary>) -> DevicesScreen {
        let mut screen = DevicesScreen::new();
        screen.now = NOW;
        screen.update(&Action::RosterUpdated(Arc::new(roster))).unwrap();
        screen
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn draw(screen: &DevicesScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn selected_key(action: Option<Action>) -> Option<String> {
        match action {
            Some(Action::SelectDevice(key)) => Some(key),
            _ => None,
        }
    }

    #[test]
    fn empty_roster_renders_notice() {
        let text = draw(&DevicesScreen::new());
        assert!(text.contains("No devices have reported yet"));
    }

    #[test]
    fn cards_show_presence_and_metrics() {
        let screen = screen_with(vec![device("gw", NOW - 5), device("ap", NOW - 600)]);

        let text = draw(&screen);

        assert!(text.contains("gw-name"), "{text}");
        assert!(text.contains("● online"));
        assert!(text.contains("○ offline"));
        assert!(text.contains("10.0.0.1 · last 5s ago"));
        assert!(text.contains("2.00 KB"));
        assert!(text.contains("(1/2 online)"));
    }

    #[test]
    fn enter_selects_card_under_cursor() {
        let mut screen = screen_with(vec![device("a", NOW), device("b", NOW)]);

        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(selected_key(action), Some("b".to_owned()));
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut screen = screen_with(vec![device("a", NOW), device("b", NOW)]);

        screen.handle_key_event(key(KeyCode::Up)).unwrap();
        assert_eq!(screen.cursor, 0);
        for _ in 0..5 {
            screen.handle_key_event(key(KeyCode::Down)).unwrap();
        }
        assert_eq!(screen.cursor, 1);
    }

    #[test]
    fn enter_on_empty_grid_does_nothing() {
        let mut screen = DevicesScreen::new();
        assert!(screen.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());
    }

    #[test]
    fn click_selects_card() {
        let mut screen = screen_with(vec![device("a", NOW), device("b", NOW)]);
        draw(&screen);

        // 80 columns fit two cards per row; the second starts after the first.
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1 + CARD_WIDTH + 2,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        let action = screen.handle_mouse_event(click).unwrap();

        assert_eq!(selected_key(action), Some("b".to_owned()));
        assert_eq!(screen.cursor, 1);
    }

    #[test]
    fn click_outside_cards_is_ignored() {
        let mut screen = screen_with(vec![device("a", NOW)]);
        draw(&screen);

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 70,
            row: 15,
            modifiers: KeyModifiers::NONE,
        };

        assert!(screen.handle_mouse_event(click).unwrap().is_none());
    }

    #[test]
    fn selection_change_moves_cursor_and_marks_card() {
        let mut screen = screen_with(vec![device("a", NOW), device("b", NOW)]);

        screen
            .update(&Action::SelectionChanged("b".into()))
            .unwrap();

        assert_eq!(screen.cursor, 1);
        assert_eq!(screen.grid.selected_index(), Some(1));
        assert!(draw(&screen).contains("▸ b-name"));
    }

    #[test]
    fn shrinking_roster_clamps_cursor() {
        let mut screen = screen_with(vec![device("a", NOW), device("b", NOW)]);
        screen.handle_key_event(key(KeyCode::End)).unwrap();

        screen
            .update(&Action::RosterUpdated(Arc::new(vec![device("a", NOW)])))
            .unwrap();

        assert_eq!(screen.cursor, 0);
    }

    #[test]
    fn rects_scroll_to_cursor() {
        let area = Rect::new(0, 0, CARD_WIDTH, CARD_HEIGHT);

        let rects = card_rects(area, 3, 2);

        assert_eq!(rects, vec![(2, Rect::new(0, 0, CARD_WIDTH, CARD_HEIGHT))]);
    }
}

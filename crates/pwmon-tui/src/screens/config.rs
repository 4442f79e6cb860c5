//! Config screen: edit the collector's router settings and trigger a pull.
//!
//! Captures all keys while shown (Ctrl-C still quits). The form is filled
//! once from `/api/config`; the password always starts empty.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use pwmon_core::{CommandOutcome, ConfigForm};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigField {
    RouterUrl,
    RouterUser,
    RouterPass,
    Interval,
    Enabled,
}

impl ConfigField {
    const ALL: [ConfigField; 5] = [
        Self::RouterUrl,
        Self::RouterUser,
        Self::RouterPass,
        Self::Interval,
        Self::Enabled,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::RouterUrl => "Router URL",
            Self::RouterUser => "Router user",
            Self::RouterPass => "Router password",
            Self::Interval => "Interval (seconds)",
            Self::Enabled => "Polling enabled",
        }
    }

    fn step(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        Self::ALL[next]
    }
}

pub struct ConfigScreen {
    focused: bool,
    form: ConfigForm,
    active_field: ConfigField,
    outcome: CommandOutcome,
    show_password: bool,
}

impl ConfigScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            form: ConfigForm::default(),
            active_field: ConfigField::RouterUrl,
            outcome: CommandOutcome::Idle,
            show_password: false,
        }
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            ConfigField::RouterUrl => Some(&mut self.form.router_url),
            ConfigField::RouterUser => Some(&mut self.form.router_user),
            ConfigField::RouterPass => Some(&mut self.form.router_pass),
            ConfigField::Interval => Some(&mut self.form.interval),
            ConfigField::Enabled => None,
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, field: ConfigField, value: &str) {
        let active = self.active_field == field;
        let [label_area, box_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).areas(area);

        let label_style = if active {
            Style::default().fg(theme::NEON_CYAN)
        } else {
            theme::text()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  {}", field.label()), label_style)),
            label_area,
        );

        let masked = field == ConfigField::RouterPass && !self.show_password;
        let mut shown = if masked {
            "\u{25CF}".repeat(value.chars().count())
        } else {
            value.to_owned()
        };
        if active {
            shown.push('\u{2588}');
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        frame.render_widget(
            Paragraph::new(Span::styled(shown, Style::default().fg(theme::NEON_CYAN))).block(block),
            box_area,
        );
    }

    fn render_toggle(&self, frame: &mut Frame, area: Rect) {
        let active = self.active_field == ConfigField::Enabled;
        let marker = if self.form.enabled { "[\u{2713}]" } else { "[ ]" };
        let marker_style = if active {
            Style::default().fg(theme::ELECTRIC_PURPLE)
        } else if self.form.enabled {
            Style::default().fg(theme::SUCCESS_GREEN)
        } else {
            theme::key_hint()
        };
        let label_style = if active {
            Style::default().fg(theme::NEON_CYAN)
        } else {
            theme::text()
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("  {marker} "), marker_style),
                Span::styled(ConfigField::Enabled.label(), label_style),
            ])),
            area,
        );
    }

    fn key_hints(&self) -> &'static str {
        match self.active_field {
            ConfigField::Enabled => "Space toggle  Tab next  Ctrl+S save  Ctrl+P pull  Esc back",
            ConfigField::RouterPass => {
                "Ctrl+U reveal  Tab next  Ctrl+S save  Ctrl+P pull  Esc back"
            }
            _ => "Tab next  Shift+Tab prev  Ctrl+S save  Ctrl+P pull  Esc back",
        }
    }
}

impl Component for ConfigScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(match key.code {
                KeyCode::Char('s') => Some(Action::SaveConfig(self.form.clone())),
                KeyCode::Char('p') => Some(Action::Pull),
                KeyCode::Char('u') => {
                    self.show_password = !self.show_password;
                    None
                }
                _ => None,
            });
        }

        match key.code {
            KeyCode::Esc => return Ok(Some(Action::SwitchScreen(ScreenId::Dashboard))),
            KeyCode::Tab | KeyCode::Down => self.active_field = self.active_field.step(true),
            KeyCode::BackTab | KeyCode::Up => self.active_field = self.active_field.step(false),
            KeyCode::Char(' ') if self.active_field == ConfigField::Enabled => {
                self.form.enabled = !self.form.enabled;
            }
            KeyCode::Backspace => {
                if let Some(input) = self.active_input_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.active_input_mut() {
                    input.push(c);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ConfigLoaded(form) => self.form = form.clone(),
            Action::CommandUpdated(outcome) => self.outcome = *outcome,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Collector Config ")
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

        let [url, user, pass, interval, enabled, _, message, _, hints] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.render_input(frame, url, ConfigField::RouterUrl, &self.form.router_url);
        self.render_input(frame, user, ConfigField::RouterUser, &self.form.router_user);
        self.render_input(frame, pass, ConfigField::RouterPass, &self.form.router_pass);
        self.render_input(frame, interval, ConfigField::Interval, &self.form.interval);
        self.render_toggle(frame, enabled);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("  {}", self.outcome),
                theme::command_message(self.outcome.phase()),
            )),
            message,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(format!("  {}", self.key_hints()), theme::key_hint())),
            hints,
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn captures_input(&self) -> bool {
        true
    }
}

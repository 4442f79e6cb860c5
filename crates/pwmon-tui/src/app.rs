//! Application core: event loop, screen management, action dispatch.
//!
//! The app owns the engine handle and the refresh scheduler. Screens only
//! ever see surface values, delivered as actions by the data bridge.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use pwmon_core::{DEFAULT_DEVICE, Dashboard, RefreshScheduler};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::{join_bridge, spawn_data_bridge};
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

pub struct App {
    dashboard: Dashboard,
    scheduler: RefreshScheduler<Dashboard>,
    /// Whether the scheduler starts with the event loop.
    autorefresh_on_start: bool,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Key of the selected device, as last reported by the store.
    selected: String,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(dashboard: Dashboard, autorefresh: bool) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        if let Some(screen) = screens.get_mut(&ScreenId::Dashboard) {
            screen.set_focused(true);
        }

        Self {
            scheduler: RefreshScheduler::new(dashboard.clone()),
            dashboard,
            autorefresh_on_start: autorefresh,
            active_screen: ScreenId::Dashboard,
            screens,
            selected: DEFAULT_DEVICE.to_owned(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let bridge = tokio::spawn(spawn_data_bridge(
            self.dashboard.clone(),
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let dashboard = self.dashboard.clone();
        tokio::spawn(async move { dashboard.bootstrap().await });
        let dashboard = self.dashboard.clone();
        tokio::spawn(async move { dashboard.load_config().await });

        if self.autorefresh_on_start {
            self.scheduler.start();
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize | Event::Render => self.action_tx.send(Action::Render)?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.scheduler.stop();
        self.data_cancel.cancel();
        join_bridge(bridge).await;
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Text-entry screens get every other key
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.captures_input() {
                return screen.handle_key_event(key);
            }
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let screen = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(ScreenId::from_number);
                if let Some(screen) = screen {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),
            (KeyModifiers::NONE, KeyCode::Char('a')) => {
                return Ok(Some(Action::ToggleAutoRefresh));
            }
            (_, KeyCode::Char('[')) => return Ok(Some(Action::SelectPrev)),
            (_, KeyCode::Char(']')) => return Ok(Some(Action::SelectNext)),

            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    self.help_visible = false;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Engine commands ──
            Action::Refresh => {
                debug!("manual refresh");
                let dashboard = self.dashboard.clone();
                tokio::spawn(async move { dashboard.refresh().await });
            }
            Action::ToggleAutoRefresh => {
                let running = self.scheduler.toggle();
                info!(autorefresh = running, "autorefresh toggled");
            }
            Action::SelectDevice(key) => self.dashboard.select_device(key.clone()),
            Action::SelectNext => self.dashboard.select_next(),
            Action::SelectPrev => self.dashboard.select_prev(),
            Action::SaveConfig(form) => {
                let dashboard = self.dashboard.clone();
                let form = form.clone();
                tokio::spawn(async move { dashboard.save_config(&form).await });
            }
            Action::Pull => {
                let dashboard = self.dashboard.clone();
                tokio::spawn(async move { dashboard.pull().await });
            }

            Action::Render => {}

            // Clock and surface updates go to every screen
            other => {
                if let Action::SelectionChanged(key) = other {
                    self.selected.clone_from(key);
                }
                self.broadcast(other)?;
            }
        }

        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content, tabs, status] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content);
        }
        self.render_tab_bar(frame, tabs);
        self.render_status_bar(frame, status);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(self.active_screen.index());

        frame.render_widget(tabs, area);
    }

    fn device_label(&self) -> String {
        let options = self.dashboard.options();
        options
            .label_for(&self.selected)
            .unwrap_or(&self.selected)
            .to_owned()
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let autorefresh = if self.scheduler.is_running() {
            Span::styled("● autorefresh on", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            Span::styled("○ autorefresh off", theme::key_hint())
        };

        let updated = self
            .dashboard
            .store()
            .last_status_at()
            .map_or_else(|| "never".to_owned(), |t| {
                t.with_timezone(&Local).format("%H:%M:%S").to_string()
            });

        let captures = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());
        let hints = if captures {
            " │ Esc back  Ctrl+C quit"
        } else {
            " │ r refresh  a auto  [/] device  ? help  q quit"
        };

        let line = Line::from(vec![
            Span::raw(" "),
            autorefresh,
            Span::styled(" │ device ", theme::key_hint()),
            Span::styled(self.device_label(), theme::key_hint_key()),
            Span::styled(format!(" │ updated {updated}"), theme::key_hint()),
            Span::styled(hints, theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 52u16.min(area.width.saturating_sub(4));
        let help_height = 19u16.min(area.height.saturating_sub(2));
        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };
        let entry = |key: &'static str, text: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(text, theme::key_hint()),
            ])
        };

        let help_text = vec![
            section("Global"),
            entry("1-3", "Jump to screen"),
            entry("Tab", "Next screen"),
            entry("r", "Refresh now"),
            entry("a", "Toggle autorefresh"),
            entry("[ / ]", "Previous / next device"),
            entry("q", "Quit"),
            Line::from(""),
            section("Devices"),
            entry("j/k ↑/↓", "Move"),
            entry("Enter", "Select device (or click)"),
            Line::from(""),
            section("Config"),
            entry("Tab", "Next field"),
            entry("Space", "Toggle polling"),
            entry("Ctrl+S", "Save"),
            entry("Ctrl+P", "Pull now"),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

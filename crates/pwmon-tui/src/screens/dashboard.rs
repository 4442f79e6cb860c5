//! Dashboard screen: traffic counters of the selected device and its
//! 24h history chart.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use pwmon_core::{ChartFrame, ChartRenderer, StatusView};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::chart::HistoryChart;

pub struct DashboardScreen {
    focused: bool,
    status: StatusView,
    renderer: ChartRenderer,
    chart: ChartFrame,
}

impl DashboardScreen {
    pub fn new() -> Self {
        let renderer = ChartRenderer::default();
        Self {
            focused: false,
            status: StatusView::default(),
            chart: renderer.render(&[]),
            renderer,
        }
    }

    fn render_counters(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        let s = &self.status;
        let counters = [
            ("Total", &s.total, &s.total_sub),
            ("LAN", &s.lan, &s.lan_sub),
            ("Local", &s.local, &s.local_sub),
            ("Rules", &s.rules, &s.backend),
        ];

        for ((title, value, sub), &col) in counters.into_iter().zip(cols.iter()) {
            let block = Block::default()
                .title(format!(" {title} "))
                .title_style(theme::title_style())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default());
            let body = Paragraph::new(vec![
                Line::from(Span::styled(value.as_str(), theme::counter_value())),
                Line::from(Span::styled(sub.as_str(), theme::key_hint())),
            ])
            .block(block);
            frame.render_widget(body, col);
        }
    }
}

impl Component for DashboardScreen {
    fn update(&mut self, action: &Action) -> color_eyre::eyre::Result<Option<Action>> {
        match action {
            Action::StatusUpdated(snapshot) => {
                self.status = StatusView::from_snapshot(snapshot);
            }
            Action::HistoryUpdated(points) => {
                self.chart = self.renderer.render(points);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [counters, chart] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(6)]).areas(area);

        self.render_counters(frame, counters);

        let s = &self.status;
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" Last 24h ", theme::title_style()),
                Span::styled(format!("· {} · {} ", s.device, s.ip), theme::text()),
            ]))
            .title(Line::from(Span::styled(format!(" {} ", s.ts), theme::key_hint())).right_aligned())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        frame.render_widget(
            HistoryChart::new(&self.chart, self.renderer.surface()).block(block),
            chart,
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

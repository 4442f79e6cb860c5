//! Paints a [`ChartFrame`] onto a ratatui canvas.
//!
//! The frame is laid out in surface units with y growing downward; the
//! canvas grows upward, so every y is flipped against the surface height.

use chrono::{DateTime, Local};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Paragraph, Widget};

use pwmon_core::format::human_bytes;
use pwmon_core::{ChartFrame, ChartSurface};

use crate::theme;

pub struct HistoryChart<'a> {
    frame: &'a ChartFrame,
    surface: ChartSurface,
    block: Option<Block<'a>>,
}

impl<'a> HistoryChart<'a> {
    pub fn new(frame: &'a ChartFrame, surface: ChartSurface) -> Self {
        Self {
            frame,
            surface,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for HistoryChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let [plot_area, caption_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let h = self.surface.height;
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, self.surface.width])
            .y_bounds([0.0, h])
            .paint(|ctx| match self.frame {
                ChartFrame::Placeholder { text, at } => {
                    ctx.print(at.x, h - at.y, Span::styled(*text, theme::key_hint()));
                }
                ChartFrame::Plot {
                    gridlines,
                    polyline,
                    label,
                    label_at,
                    ..
                } => {
                    for seg in gridlines {
                        ctx.draw(&CanvasLine::new(
                            seg.from.x,
                            h - seg.from.y,
                            seg.to.x,
                            h - seg.to.y,
                            theme::GRID_GRAY,
                        ));
                    }
                    ctx.layer();
                    for pair in polyline.windows(2) {
                        let [a, b] = pair else { continue };
                        ctx.draw(&CanvasLine::new(a.x, h - a.y, b.x, h - b.y, theme::NEON_CYAN));
                    }
                    // A lone sample has no segment to carry it
                    if let [only] = polyline.as_slice() {
                        ctx.draw(&Points {
                            coords: &[(only.x, h - only.y)],
                            color: theme::NEON_CYAN,
                        });
                    }
                    ctx.print(
                        label_at.x,
                        h - label_at.y,
                        Span::styled(*label, theme::title_style()),
                    );
                }
            });
        canvas.render(plot_area, buf);

        if let Some(caption) = caption(self.frame) {
            Paragraph::new(caption).render(caption_area, buf);
        }
    }
}

/// Time range and peak under the plot. Nothing for the placeholder.
fn caption(frame: &ChartFrame) -> Option<Line<'static>> {
    let ChartFrame::Plot {
        max_value,
        min_t,
        max_t,
        ..
    } = frame
    else {
        return None;
    };

    Some(Line::from(vec![
        Span::styled(
            format!(" {} → {}", clock(*min_t), clock(*max_t)),
            theme::key_hint(),
        ),
        Span::styled("   peak ", theme::key_hint()),
        Span::styled(human_bytes(*max_value), theme::text()),
    ]))
}

fn clock(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0).map_or_else(
        || "--:--".to_owned(),
        |t| t.with_timezone(&Local).format("%H:%M").to_string(),
    )
}

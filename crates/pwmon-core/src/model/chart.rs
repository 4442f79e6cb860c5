// ── History chart geometry ──
//
// Maps a history series onto a fixed drawing surface. Coordinates use the
// canvas convention: origin top-left, y grows downward. Front ends flip or
// scale as their backend requires.

use pwmon_api::HistoryPoint;

const GRIDLINES: u32 = 5;
const PLACEHOLDER_TEXT: &str = "No data";
const SERIES_LABEL: &str = "Total";

/// Dimensions of the drawing surface, in abstract units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSurface {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl ChartSurface {
    pub const DEFAULT: Self = Self {
        width: 600.0,
        height: 240.0,
        margin: 30.0,
    };
}

impl Default for ChartSurface {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// A complete, self-contained drawing of one history series.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartFrame {
    /// Empty series: a lone notice, no axes.
    Placeholder { text: &'static str, at: Point },
    Plot {
        gridlines: Vec<Segment>,
        polyline: Vec<Point>,
        label: &'static str,
        label_at: Point,
        /// Value mapped to the top of the plot area (at least 1).
        max_value: u64,
        min_t: i64,
        max_t: i64,
    },
}

impl ChartFrame {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Stateless renderer: every call yields a full frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer {
    surface: ChartSurface,
}

impl ChartRenderer {
    pub const fn new(surface: ChartSurface) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> ChartSurface {
        self.surface
    }

    /// Lay out `points` in the order given. The series is expected to be
    /// ascending by `t`; it is never re-sorted.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn render(&self, points: &[HistoryPoint]) -> ChartFrame {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return ChartFrame::Placeholder {
                text: PLACEHOLDER_TEXT,
                at: Point { x: 20.0, y: 20.0 },
            };
        };

        let ChartSurface {
            width: w,
            height: h,
            margin: m,
        } = self.surface;

        let min_t = first.t;
        let max_t = last.t;
        let max_value = points
            .iter()
            .map(|p| p.total_bytes)
            .max()
            .unwrap_or(0)
            .max(1);

        let span = if max_t == min_t {
            1.0
        } else {
            max_t.saturating_sub(min_t) as f64
        };
        let max_val = max_value as f64;

        let x_for = |t: i64| m + (t.saturating_sub(min_t) as f64) / span * (w - 2.0 * m);
        let y_for = |v: u64| h - m - (v as f64 / max_val) * (h - 2.0 * m);

        let step = (h - 2.0 * m) / f64::from(GRIDLINES - 1);
        let gridlines = (0..GRIDLINES)
            .map(|i| {
                let y = m + f64::from(i) * step;
                Segment {
                    from: Point { x: m, y },
                    to: Point { x: w - m, y },
                }
            })
            .collect();

        let polyline = points
            .iter()
            .map(|p| Point {
                x: x_for(p.t),
                y: y_for(p.total_bytes),
            })
            .collect();

        ChartFrame::Plot {
            gridlines,
            polyline,
            label: SERIES_LABEL,
            label_at: Point { x: m, y: m - 8.0 },
            max_value,
            min_t,
            max_t,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn pt(t: i64, total_bytes: u64) -> HistoryPoint {
        HistoryPoint { t, total_bytes }
    }

    fn plot(frame: ChartFrame) -> (Vec<Segment>, Vec<Point>, u64) {
        match frame {
            ChartFrame::Plot {
                gridlines,
                polyline,
                max_value,
                ..
            } => (gridlines, polyline, max_value),
            ChartFrame::Placeholder { .. } => panic!("expected a plot"),
        }
    }

    #[test]
    fn empty_series_is_placeholder() {
        let frame = ChartRenderer::default().render(&[]);

        assert_eq!(
            frame,
            ChartFrame::Placeholder {
                text: "No data",
                at: Point { x: 20.0, y: 20.0 },
            }
        );
    }

    #[test]
    fn gridlines_are_evenly_spaced() {
        let (gridlines, _, _) = plot(ChartRenderer::default().render(&[pt(0, 10), pt(10, 20)]));

        let ys: Vec<f64> = gridlines.iter().map(|g| g.from.y).collect();
        assert_eq!(ys, vec![30.0, 75.0, 120.0, 165.0, 210.0]);
        assert!(gridlines.iter().all(|g| g.from.x == 30.0 && g.to.x == 570.0));
    }

    #[test]
    fn polyline_spans_plot_area() {
        let frame = ChartRenderer::default().render(&[pt(100, 0), pt(150, 50), pt(200, 100)]);
        let (_, polyline, max_value) = plot(frame);

        assert_eq!(max_value, 100);
        assert_eq!(polyline[0], Point { x: 30.0, y: 210.0 });
        assert_eq!(polyline[1], Point { x: 300.0, y: 120.0 });
        assert_eq!(polyline[2], Point { x: 570.0, y: 30.0 });
    }

    #[test]
    fn single_point_sits_on_left_edge() {
        let (_, polyline, _) = plot(ChartRenderer::default().render(&[pt(42, 7)]));

        assert_eq!(polyline, vec![Point { x: 30.0, y: 30.0 }]);
    }

    #[test]
    fn all_zero_series_stays_on_baseline() {
        let (_, polyline, max_value) =
            plot(ChartRenderer::default().render(&[pt(0, 0), pt(60, 0)]));

        assert_eq!(max_value, 1);
        assert!(polyline.iter().all(|p| p.y == 210.0));
    }

    #[test]
    fn label_above_plot_area() {
        let frame = ChartRenderer::default().render(&[pt(0, 1)]);

        let ChartFrame::Plot { label, label_at, .. } = frame else {
            panic!("expected a plot");
        };
        assert_eq!(label, "Total");
        assert_eq!(label_at, Point { x: 30.0, y: 22.0 });
    }

    #[test]
    fn custom_surface() {
        let renderer = ChartRenderer::new(ChartSurface {
            width: 100.0,
            height: 50.0,
            margin: 10.0,
        });
        let (gridlines, polyline, _) = plot(renderer.render(&[pt(0, 2), pt(1, 4)]));

        assert_eq!(gridlines[4].from.y, 40.0);
        assert_eq!(polyline[0], Point { x: 10.0, y: 25.0 });
        assert_eq!(polyline[1], Point { x: 90.0, y: 10.0 });
    }
}

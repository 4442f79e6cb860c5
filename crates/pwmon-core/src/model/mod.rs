// ── View models ──
//
// Immutable, render-ready values derived from collector data. Building a
// view never touches the network and never mutates its input.

pub mod chart;
pub mod config;
pub mod device;
pub mod status;

pub use chart::{ChartFrame, ChartRenderer, ChartSurface, Point, Segment};
pub use config::ConfigForm;
pub use device::{DeviceCard, DeviceGrid, DeviceMetric, DeviceOption, DeviceOptions, Presence, Scope};
pub use status::StatusView;

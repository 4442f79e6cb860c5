//! Reusable render helpers shared by the screens.

pub mod chart;
pub mod status_indicator;

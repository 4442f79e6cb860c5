//! Screen implementations. Each screen is a top-level Component.

pub mod config;
pub mod dashboard;
pub mod devices;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per tab-bar screen.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (ScreenId::Devices, Box::new(devices::DevicesScreen::new())),
        (ScreenId::Config, Box::new(config::ConfigScreen::new())),
    ]
}

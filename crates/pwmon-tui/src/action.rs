//! Every state transition in the TUI is expressed as an [`Action`].

use std::sync::Arc;

use pwmon_core::{CommandOutcome, ConfigForm, DeviceSummary, HistoryPoint, StatusSnapshot};

use crate::screen::ScreenId;

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Engine commands ───────────────────────────────────────────
    /// Re-fetch status and history of the selected device.
    Refresh,
    ToggleAutoRefresh,
    SelectDevice(String),
    SelectNext,
    SelectPrev,
    SaveConfig(ConfigForm),
    Pull,

    // ── Surface updates (from the data bridge) ────────────────────
    StatusUpdated(Arc<StatusSnapshot>),
    RosterUpdated(Arc<Vec<DeviceSummary>>),
    HistoryUpdated(Arc<Vec<HistoryPoint>>),
    ConfigLoaded(ConfigForm),
    CommandUpdated(CommandOutcome),
    SelectionChanged(String),
}

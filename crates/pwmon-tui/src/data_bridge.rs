//! Data bridge: forwards every [`SurfaceStore`] publish to the TUI as an
//! [`Action`].
//!
//! [`SurfaceStore`]: pwmon_core::SurfaceStore

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use pwmon_core::{DEFAULT_DEVICE, Dashboard};

use crate::action::Action;

fn selection_key(selection: Option<String>) -> String {
    selection.unwrap_or_else(|| DEFAULT_DEVICE.to_owned())
}

/// Send the current value of every surface, then forward changes until
/// cancelled.
pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let store = dashboard.store();
    let mut status = store.subscribe_status();
    let mut roster = store.subscribe_roster();
    let mut history = store.subscribe_history();
    let mut config_form = store.subscribe_config_form();
    let mut command = store.subscribe_command();
    let mut selection = store.subscribe_selection();

    // Initial snapshots so screens have data immediately
    let _ = action_tx.send(Action::StatusUpdated(status.current().clone()));
    let _ = action_tx.send(Action::RosterUpdated(roster.current().clone()));
    let _ = action_tx.send(Action::HistoryUpdated(history.current().clone()));
    let _ = action_tx.send(Action::CommandUpdated(*command.current()));
    let _ = action_tx.send(Action::SelectionChanged(selection_key(
        selection.current().clone(),
    )));
    if let Some(form) = config_form.current().clone() {
        let _ = action_tx.send(Action::ConfigLoaded(form));
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(s) = status.changed() => {
                let _ = action_tx.send(Action::StatusUpdated(s));
            }
            Some(r) = roster.changed() => {
                debug!(devices = r.len(), "dispatching RosterUpdated");
                let _ = action_tx.send(Action::RosterUpdated(r));
            }
            Some(h) = history.changed() => {
                let _ = action_tx.send(Action::HistoryUpdated(h));
            }
            Some(sel) = selection.changed() => {
                let _ = action_tx.send(Action::SelectionChanged(selection_key(sel)));
            }
            Some(c) = command.changed() => {
                let _ = action_tx.send(Action::CommandUpdated(c));
            }
            Some(form) = config_form.changed() => {
                if let Some(form) = form {
                    let _ = action_tx.send(Action::ConfigLoaded(form));
                }
            }
        }
    }

    debug!("data bridge stopped");
}

/// Wait for the bridge task after cancelling it. Returns `false` if the
/// task panicked or was aborted.
pub async fn join_bridge(bridge: JoinHandle<()>) -> bool {
    match bridge.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "data bridge ended abnormally");
            false
        }
    }
}

// ── Surface store ──
//
// One `watch` channel per dashboard surface. Every publish replaces the
// whole value, so a subscriber never observes a half-applied update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pwmon_api::{DeviceSummary, HistoryPoint, StatusSnapshot};
use tokio::sync::watch;

use crate::command::CommandOutcome;
use crate::model::ConfigForm;
use crate::stream::SurfaceStream;

/// Latest successfully retrieved state of every surface.
///
/// Failed fetches never publish, so each surface keeps its previous value.
pub struct SurfaceStore {
    pub(crate) status: watch::Sender<Arc<StatusSnapshot>>,
    pub(crate) roster: watch::Sender<Arc<Vec<DeviceSummary>>>,
    pub(crate) history: watch::Sender<Arc<Vec<HistoryPoint>>>,
    pub(crate) config_form: watch::Sender<Option<ConfigForm>>,
    pub(crate) command: watch::Sender<CommandOutcome>,
    pub(crate) selection: watch::Sender<Option<String>>,
    pub(crate) last_status_at: watch::Sender<Option<DateTime<Utc>>>,
}

impl SurfaceStore {
    pub fn new() -> Self {
        let (status, _) = watch::channel(Arc::new(StatusSnapshot::default()));
        let (roster, _) = watch::channel(Arc::new(Vec::new()));
        let (history, _) = watch::channel(Arc::new(Vec::new()));
        let (config_form, _) = watch::channel(None);
        let (command, _) = watch::channel(CommandOutcome::Idle);
        let (selection, _) = watch::channel(None);
        let (last_status_at, _) = watch::channel(None);

        Self {
            status,
            roster,
            history,
            config_form,
            command,
            selection,
            last_status_at,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn status_snapshot(&self) -> Arc<StatusSnapshot> {
        self.status.borrow().clone()
    }

    pub fn roster_snapshot(&self) -> Arc<Vec<DeviceSummary>> {
        self.roster.borrow().clone()
    }

    pub fn history_snapshot(&self) -> Arc<Vec<HistoryPoint>> {
        self.history.borrow().clone()
    }

    pub fn config_form(&self) -> Option<ConfigForm> {
        self.config_form.borrow().clone()
    }

    pub fn command_outcome(&self) -> CommandOutcome {
        *self.command.borrow()
    }

    /// Explicitly selected device key, if any.
    pub fn selection(&self) -> Option<String> {
        self.selection.borrow().clone()
    }

    pub fn last_status_at(&self) -> Option<DateTime<Utc>> {
        *self.last_status_at.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_status(&self) -> SurfaceStream<Arc<StatusSnapshot>> {
        SurfaceStream::new(self.status.subscribe())
    }

    pub fn subscribe_roster(&self) -> SurfaceStream<Arc<Vec<DeviceSummary>>> {
        SurfaceStream::new(self.roster.subscribe())
    }

    pub fn subscribe_history(&self) -> SurfaceStream<Arc<Vec<HistoryPoint>>> {
        SurfaceStream::new(self.history.subscribe())
    }

    pub fn subscribe_config_form(&self) -> SurfaceStream<Option<ConfigForm>> {
        SurfaceStream::new(self.config_form.subscribe())
    }

    pub fn subscribe_command(&self) -> SurfaceStream<CommandOutcome> {
        SurfaceStream::new(self.command.subscribe())
    }

    pub fn subscribe_selection(&self) -> SurfaceStream<Option<String>> {
        SurfaceStream::new(self.selection.subscribe())
    }

    // ── Publishing ───────────────────────────────────────────────────

    pub(crate) fn publish_status(&self, snapshot: StatusSnapshot) {
        self.status.send_replace(Arc::new(snapshot));
        self.last_status_at.send_replace(Some(Utc::now()));
    }

    pub(crate) fn publish_roster(&self, roster: Vec<DeviceSummary>) {
        self.roster.send_replace(Arc::new(roster));
    }

    pub(crate) fn publish_history(&self, points: Vec<HistoryPoint>) {
        self.history.send_replace(Arc::new(points));
    }

    pub(crate) fn publish_config_form(&self, form: ConfigForm) {
        self.config_form.send_replace(Some(form));
    }

    pub(crate) fn publish_command(&self, outcome: CommandOutcome) {
        self.command.send_replace(outcome);
    }

    pub(crate) fn set_selection(&self, key: String) {
        self.selection.send_replace(Some(key));
    }
}

impl Default for SurfaceStore {
    fn default() -> Self {
        Self::new()
    }
}

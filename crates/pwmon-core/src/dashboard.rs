// ── Dashboard engine ──
//
// Runs the status, roster and history syncs against the collector and
// relays the save/pull commands. Results land in the `SurfaceStore`.
// Device-scoped responses are tagged with the key they were requested for
// and dropped if the selection moved on while they were in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use pwmon_api::CollectorClient;
use tracing::{debug, info, warn};

use crate::command::CommandOutcome;
use crate::error::CoreError;
use crate::model::device::DEFAULT_KEY;
use crate::model::{ConfigForm, DeviceGrid, DeviceOptions, StatusView};
use crate::scheduler::Tick;
use crate::store::SurfaceStore;

/// Device key used until a device is selected.
pub const DEFAULT_DEVICE: &str = DEFAULT_KEY;

/// Trailing window requested from `/api/history`.
const HISTORY_WINDOW_SECS: i64 = 24 * 3600;

/// What became of one sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SyncOutcome {
    /// The response was published.
    Applied,
    /// The response arrived for a device that is no longer selected.
    Discarded,
    /// The request failed; the surface keeps its previous value.
    Failed,
}

// ── Dashboard ────────────────────────────────────────────────────

/// The sync engine.
///
/// Cheaply cloneable via `Arc<DashboardInner>`, so handles can be moved
/// into spawned tasks freely.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    client: CollectorClient,
    store: SurfaceStore,
    /// Bumped by every save/pull; only the newest may publish its result.
    command_generation: AtomicU64,
}

impl Dashboard {
    pub fn new(client: CollectorClient) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                client,
                store: SurfaceStore::new(),
                command_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn store(&self) -> &SurfaceStore {
        &self.inner.store
    }

    // ── Selection ────────────────────────────────────────────────

    /// The selected device key, or `"default"` before anything is selected.
    pub fn current_device(&self) -> String {
        self.inner
            .store
            .selection()
            .unwrap_or_else(|| DEFAULT_DEVICE.to_owned())
    }

    /// Select a device and refresh its status and history in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn select_device(&self, key: impl Into<String>) {
        let key = key.into();
        debug!(device = %key, "device selected");
        self.inner.store.set_selection(key);

        let this = self.clone();
        tokio::spawn(async move { this.refresh().await });
    }

    /// Select the option after the current one, wrapping around.
    pub fn select_next(&self) {
        let next = self.options().next_key(&self.current_device()).to_owned();
        self.select_device(next);
    }

    /// Select the option before the current one, wrapping around.
    pub fn select_prev(&self) {
        let prev = self.options().prev_key(&self.current_device()).to_owned();
        self.select_device(prev);
    }

    fn still_selected(&self, key: &str) -> bool {
        self.current_device() == key
    }

    // ── Views ────────────────────────────────────────────────────

    pub fn status_view(&self) -> StatusView {
        StatusView::from_snapshot(&self.inner.store.status_snapshot())
    }

    pub fn options(&self) -> DeviceOptions {
        DeviceOptions::from_roster(&self.inner.store.roster_snapshot())
    }

    pub fn device_grid(&self, now: i64) -> DeviceGrid {
        DeviceGrid::build(
            &self.inner.store.roster_snapshot(),
            &self.current_device(),
            now,
        )
    }

    // ── Syncs ────────────────────────────────────────────────────

    /// Fetch the status snapshot of the selected device.
    pub async fn sync_status(&self) -> SyncOutcome {
        let key = self.current_device();

        match self.inner.client.get_status(&key).await.map_err(CoreError::from) {
            Ok(_) if !self.still_selected(&key) => {
                debug!(device = %key, "discarding status for deselected device");
                SyncOutcome::Discarded
            }
            Ok(snapshot) => {
                self.inner.store.publish_status(snapshot);
                SyncOutcome::Applied
            }
            Err(e) => {
                debug!(
                    device = %key,
                    error = %e,
                    transient = e.is_transient(),
                    "status sync failed"
                );
                SyncOutcome::Failed
            }
        }
    }

    /// Fetch the trailing 24h history of the selected device.
    pub async fn sync_history(&self) -> SyncOutcome {
        let key = self.current_device();
        let since = Utc::now().timestamp() - HISTORY_WINDOW_SECS;

        match self
            .inner
            .client
            .get_history(&key, since)
            .await
            .map_err(CoreError::from)
        {
            Ok(_) if !self.still_selected(&key) => {
                debug!(device = %key, "discarding history for deselected device");
                SyncOutcome::Discarded
            }
            Ok(points) => {
                debug!(device = %key, points = points.len(), "history updated");
                self.inner.store.publish_history(points);
                SyncOutcome::Applied
            }
            Err(e) => {
                debug!(
                    device = %key,
                    error = %e,
                    transient = e.is_transient(),
                    "history sync failed"
                );
                SyncOutcome::Failed
            }
        }
    }

    /// Fetch the device roster. Not device-scoped: the last response wins.
    pub async fn sync_devices(&self) -> SyncOutcome {
        match self.inner.client.list_devices().await.map_err(CoreError::from) {
            Ok(roster) => {
                debug!(devices = roster.len(), "roster updated");
                self.inner.store.publish_roster(roster);
                SyncOutcome::Applied
            }
            Err(e) => {
                debug!(error = %e, transient = e.is_transient(), "roster sync failed");
                SyncOutcome::Failed
            }
        }
    }

    /// Status and history of the selected device, concurrently.
    pub async fn refresh(&self) {
        let (status, history) = tokio::join!(self.sync_status(), self.sync_history());
        debug!(%status, %history, "refresh finished");
    }

    /// Start-up sequence: load the roster, select its first entry unless
    /// a device is already selected, then refresh status and history.
    pub async fn bootstrap(&self) {
        if self.sync_devices().await == SyncOutcome::Applied
            && self.inner.store.selection().is_none()
        {
            let first = self.options().first_key().to_owned();
            info!(device = %first, "selecting first device");
            self.inner.store.set_selection(first);
        }
        self.refresh().await;
    }

    // ── Config panel ─────────────────────────────────────────────

    /// Populate the config form from the collector. Failures are silent.
    pub async fn load_config(&self) -> SyncOutcome {
        match self.inner.client.get_config().await.map_err(CoreError::from) {
            Ok(cfg) => {
                self.inner.store.publish_config_form(ConfigForm::from_config(&cfg));
                SyncOutcome::Applied
            }
            Err(e) => {
                debug!(error = %e, transient = e.is_transient(), "config load failed");
                SyncOutcome::Failed
            }
        }
    }

    /// Send the whole form to the collector.
    pub async fn save_config(&self, form: &ConfigForm) -> CommandOutcome {
        let generation = self.begin_command(CommandOutcome::Saving);
        let update = form.to_update();

        let outcome = match self
            .inner
            .client
            .save_config(&update)
            .await
            .map_err(CoreError::from)
        {
            Ok(_) => {
                info!("collector configuration saved");
                CommandOutcome::Saved
            }
            Err(e) => {
                warn!(
                    error = %e,
                    transient = e.is_transient(),
                    "saving collector configuration failed"
                );
                CommandOutcome::SaveFailed
            }
        };

        self.finish_command(generation, outcome);
        outcome
    }

    /// Ask the collector to poll the router now. On success the status
    /// surface is refreshed right away.
    pub async fn pull(&self) -> CommandOutcome {
        let generation = self.begin_command(CommandOutcome::Pulling);

        let outcome = match self.inner.client.pull_now().await.map_err(CoreError::from) {
            Ok(resp) if resp.ok => {
                info!("collector pulled");
                CommandOutcome::Pulled
            }
            Ok(resp) => {
                warn!(
                    error = resp.error.as_deref().unwrap_or("<none>"),
                    "collector refused pull"
                );
                CommandOutcome::PullRejected
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "pull request failed");
                CommandOutcome::PullFailed
            }
        };

        self.finish_command(generation, outcome);
        if outcome == CommandOutcome::Pulled {
            self.sync_status().await;
        }
        outcome
    }

    fn begin_command(&self, pending: CommandOutcome) -> u64 {
        let generation = self.inner.command_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.store.publish_command(pending);
        generation
    }

    fn finish_command(&self, generation: u64, outcome: CommandOutcome) {
        if self.inner.command_generation.load(Ordering::SeqCst) == generation {
            self.inner.store.publish_command(outcome);
        } else {
            debug!(%outcome, "command superseded, outcome not shown");
        }
    }
}

impl Tick for Dashboard {
    /// Fire status, history and roster syncs without waiting on them.
    fn tick(&self) {
        let this = self.clone();
        tokio::spawn(async move { this.sync_status().await });
        let this = self.clone();
        tokio::spawn(async move { this.sync_history().await });
        let this = self.clone();
        tokio::spawn(async move { this.sync_devices().await });
    }
}

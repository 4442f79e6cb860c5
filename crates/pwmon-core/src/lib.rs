//! Sync engine between `pwmon-api` and the dashboard front end.
//!
//! This crate owns the refresh logic and the view models of the traffic
//! dashboard:
//!
//! - **[`Dashboard`]** - Cheaply cloneable engine handle. Runs the status,
//!   roster and history syncs for the selected device, relays the save and
//!   pull commands, and discards responses that arrive for a device that is
//!   no longer selected.
//!
//! - **[`SurfaceStore`]** - One `tokio::sync::watch` channel per visual
//!   surface. Publishing replaces the whole value; consumers subscribe
//!   through [`SurfaceStream`].
//!
//! - **[`RefreshScheduler`]** - Owns the single periodic timer task and
//!   drives anything implementing [`Tick`].
//!
//! - **View models** ([`model`]) - Immutable, render-ready values built from
//!   wire data: [`StatusView`], [`DeviceGrid`], [`DeviceOptions`],
//!   [`ChartFrame`] and [`ConfigForm`].

pub mod command;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod model;
pub mod scheduler;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{CommandOutcome, CommandPhase};
pub use dashboard::{DEFAULT_DEVICE, Dashboard, SyncOutcome};
pub use error::CoreError;
pub use scheduler::{REFRESH_PERIOD, RefreshScheduler, Tick};
pub use store::SurfaceStore;
pub use stream::SurfaceStream;

pub use model::{
    // Chart
    ChartFrame,
    ChartRenderer,
    ChartSurface,
    // Config
    ConfigForm,
    // Devices
    DeviceCard,
    DeviceGrid,
    DeviceMetric,
    DeviceOption,
    DeviceOptions,
    Point,
    Presence,
    Scope,
    Segment,
    // Status
    StatusView,
};

// Wire types consumers need alongside the engine.
pub use pwmon_api::{CollectorClient, DeviceSummary, HistoryPoint, StatusSnapshot, TransportConfig};

// pwmon-api: Async Rust client for the traffic collector's `/api/*` endpoints

pub mod client;
pub mod control;
pub mod devices;
pub mod error;
pub mod history;
pub mod models;
pub mod status;
pub mod transport;

mod de;

pub use client::CollectorClient;
pub use error::Error;
pub use models::{
    CollectorConfig, ConfigUpdate, DeviceSummary, HistoryPoint, PullResponse, StatusSnapshot,
};
pub use transport::TransportConfig;

// Collector control endpoints
//
// Configuration read/write and the one-shot "pull now" command.

use tracing::debug;

use crate::client::CollectorClient;
use crate::error::Error;
use crate::models::{CollectorConfig, ConfigUpdate, PullResponse};

impl CollectorClient {
    /// Read the collector configuration (never includes the password).
    ///
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<CollectorConfig, Error> {
        let url = self.api_url("config")?;
        debug!("fetching collector config");
        self.get(url).await
    }

    /// Replace the collector configuration.
    ///
    /// `POST /api/config`. The reply is returned loosely typed; success is
    /// decided by the status code alone.
    pub async fn save_config(&self, update: &ConfigUpdate) -> Result<serde_json::Value, Error> {
        let url = self.api_url("config")?;
        debug!(router_url = %update.router_url, interval = update.interval, "saving collector config");
        self.post(url, update).await
    }

    /// Ask the collector to poll the router immediately.
    ///
    /// `POST /api/pull` with no body. A reply that is not an object (e.g.
    /// `null`) decodes as "not ok".
    pub async fn pull_now(&self) -> Result<PullResponse, Error> {
        let url = self.api_url("pull")?;
        debug!("triggering pull");
        let resp: Option<PullResponse> = self.post_empty(url).await?;
        Ok(resp.unwrap_or_default())
    }
}

// Device roster endpoint

use tracing::debug;

use crate::client::CollectorClient;
use crate::error::Error;
use crate::models::DeviceSummary;

impl CollectorClient {
    /// List every device the collector has seen, newest ingest first.
    ///
    /// `GET /api/devices`. A `null` body is treated as an empty roster.
    pub async fn list_devices(&self) -> Result<Vec<DeviceSummary>, Error> {
        let url = self.api_url("devices")?;
        debug!("listing devices");
        let devices: Option<Vec<DeviceSummary>> = self.get(url).await?;
        Ok(devices.unwrap_or_default())
    }
}

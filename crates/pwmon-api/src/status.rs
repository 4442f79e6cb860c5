// Status endpoint
//
// Latest aggregate snapshot for one device.

use tracing::debug;

use crate::client::CollectorClient;
use crate::error::Error;
use crate::models::StatusSnapshot;

impl CollectorClient {
    /// Fetch the current snapshot for a device.
    ///
    /// `GET /api/status?device={key}`
    pub async fn get_status(&self, device: &str) -> Result<StatusSnapshot, Error> {
        let mut url = self.api_url("status")?;
        url.query_pairs_mut().append_pair("device", device);
        debug!(device, "fetching status");
        self.get(url).await
    }
}

// History endpoint
//
// Per-device series of total byte counters. The collector caps the reply
// at its most recent 2000 samples.

use tracing::debug;

use crate::client::CollectorClient;
use crate::error::Error;
use crate::models::HistoryPoint;

impl CollectorClient {
    /// Fetch samples with `t >= since` for a device.
    ///
    /// `GET /api/history?device={key}&since={epoch}`. Order is whatever the
    /// collector stored (ascending by ingest time); it is not re-sorted here.
    pub async fn get_history(&self, device: &str, since: i64) -> Result<Vec<HistoryPoint>, Error> {
        let mut url = self.api_url("history")?;
        url.query_pairs_mut()
            .append_pair("device", device)
            .append_pair("since", &since.to_string());
        debug!(device, since, "fetching history");
        let points: Option<Vec<HistoryPoint>> = self.get(url).await?;
        Ok(points.unwrap_or_default())
    }
}

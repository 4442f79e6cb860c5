// Collector HTTP client
//
// Wraps `reqwest::Client` with collector URL construction, status checking,
// and JSON decoding. Endpoint groups (status, devices, history, control) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the traffic collector.
///
/// Every method returns the decoded body on a 2xx response. Any other
/// status is an [`Error::Status`], whatever the body says.
#[derive(Debug, Clone)]
pub struct CollectorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CollectorClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the collector root (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The collector base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    ///
    /// A base URL with a path prefix (reverse proxy) is kept intact.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/api/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        );
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON reply.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode(resp).await
    }

    /// Send a POST request without a body and decode the JSON reply.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {} (no body)", url);

        let resp = self
            .http
            .post(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode(resp).await
    }

    /// Reject non-2xx responses, then decode the body.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                path: resp.url().path().to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

// Collector wire types
//
// Field names mirror the collector's JSON exactly. Every field is decoded
// leniently (see `de`) because the collector stores agent payloads verbatim.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::de;

// ── Status ───────────────────────────────────────────────────────────

/// Aggregate counters for one device, from `GET /api/status`.
///
/// An unknown device yields `{}`, which decodes to all defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, deserialize_with = "de::u64")]
    pub total_bytes: u64,
    #[serde(default, deserialize_with = "de::u64")]
    pub local_bytes: u64,
    #[serde(default, deserialize_with = "de::u64")]
    pub lan_bytes: u64,
    #[serde(default, deserialize_with = "de::u64")]
    pub total_packets: u64,
    #[serde(default, deserialize_with = "de::u64")]
    pub local_packets: u64,
    #[serde(default, deserialize_with = "de::u64")]
    pub lan_packets: u64,
    /// Number of active accounting rules on the router.
    #[serde(default, deserialize_with = "de::u64")]
    pub rules: u64,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub backend: Option<String>,
    /// Agent-side timestamp, shown verbatim.
    #[serde(default, deserialize_with = "de::string_opt")]
    pub ts: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub device: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub ip: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// One roster entry from `GET /api/devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Stable identity used for selection. Uniqueness is the collector's job.
    #[serde(default, deserialize_with = "de::string")]
    pub key: String,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub device: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub ip: Option<String>,
    #[serde(default, deserialize_with = "de::u64")]
    pub total_bytes: u64,
    #[serde(default, deserialize_with = "de::u64")]
    pub local_bytes: u64,
    #[serde(default, deserialize_with = "de::u64")]
    pub lan_bytes: u64,
    /// Epoch seconds of the last ingest for this device.
    #[serde(default, deserialize_with = "de::i64")]
    pub received_at: i64,
}

impl DeviceSummary {
    /// Display label: the device name, falling back to the key.
    pub fn label(&self) -> &str {
        self.device.as_deref().unwrap_or(&self.key)
    }
}

// ── History ──────────────────────────────────────────────────────────

/// One sample of the 24h series from `GET /api/history`.
///
/// The collector also sends `lan_bytes`/`local_bytes`; only the total is
/// charted, so the rest is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(default, deserialize_with = "de::i64")]
    pub t: i64,
    #[serde(default, deserialize_with = "de::u64")]
    pub total_bytes: u64,
}

// ── Configuration ────────────────────────────────────────────────────

/// Collector configuration as returned by `GET /api/config`.
///
/// The password is never part of this type: it is write-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default, deserialize_with = "de::string_opt")]
    pub router_url: Option<String>,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub router_user: Option<String>,
    /// Polling interval in seconds.
    #[serde(default, deserialize_with = "de::u64_opt")]
    pub interval: Option<u64>,
    #[serde(default, deserialize_with = "de::truthy")]
    pub enabled: bool,
}

/// Body of `POST /api/config`.
///
/// Always carries every field. An empty password is sent as-is; whether
/// that means "unchanged" or "cleared" is up to the collector.
#[derive(Debug, Serialize)]
pub struct ConfigUpdate {
    pub router_url: String,
    pub router_user: String,
    #[serde(serialize_with = "expose_password")]
    pub router_pass: SecretString,
    pub interval: u64,
    pub enabled: bool,
}

fn expose_password<S: Serializer>(secret: &SecretString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(secret.expose_secret())
}

// ── Pull ─────────────────────────────────────────────────────────────

/// Reply of `POST /api/pull`: `{"ok": true}` or `{"error": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PullResponse {
    #[serde(default, deserialize_with = "de::truthy")]
    pub ok: bool,
    #[serde(default, deserialize_with = "de::string_opt")]
    pub error: Option<String>,
}

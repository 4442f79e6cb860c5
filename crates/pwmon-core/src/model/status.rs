// ── Status counters view ──

use pwmon_api::StatusSnapshot;

use crate::format::human_bytes;

const PLACEHOLDER: &str = "--";

/// Text for every field of the status counters surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub total: String,
    pub total_sub: String,
    pub lan: String,
    pub lan_sub: String,
    pub local: String,
    pub local_sub: String,
    pub rules: String,
    pub backend: String,
    pub ts: String,
    pub total_packets: String,
    pub local_packets: String,
    pub lan_packets: String,
    pub device: String,
    pub ip: String,
}

impl StatusView {
    pub fn from_snapshot(snap: &StatusSnapshot) -> Self {
        Self {
            total: human_bytes(snap.total_bytes),
            total_sub: packets_label(snap.total_packets),
            lan: human_bytes(snap.lan_bytes),
            lan_sub: packets_label(snap.lan_packets),
            local: human_bytes(snap.local_bytes),
            local_sub: packets_label(snap.local_packets),
            rules: snap.rules.to_string(),
            backend: format!("{} backend", snap.backend.as_deref().unwrap_or("unknown")),
            ts: or_placeholder(snap.ts.as_deref()),
            total_packets: snap.total_packets.to_string(),
            local_packets: snap.local_packets.to_string(),
            lan_packets: snap.lan_packets.to_string(),
            device: or_placeholder(snap.device.as_deref()),
            ip: or_placeholder(snap.ip.as_deref()),
        }
    }
}

impl Default for StatusView {
    fn default() -> Self {
        Self::from_snapshot(&StatusSnapshot::default())
    }
}

fn packets_label(count: u64) -> String {
    format!("{count} packets")
}

fn or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(PLACEHOLDER).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_uses_placeholders() {
        let view = StatusView::from_snapshot(&StatusSnapshot::default());

        assert_eq!(view.total, "0 B");
        assert_eq!(view.total_sub, "0 packets");
        assert_eq!(view.rules, "0");
        assert_eq!(view.backend, "unknown backend");
        assert_eq!(view.ts, "--");
        assert_eq!(view.device, "--");
        assert_eq!(view.ip, "--");
    }

    #[test]
    fn populated_snapshot() {
        let snap = StatusSnapshot {
            total_bytes: 1536,
            lan_bytes: 1024,
            local_bytes: 512,
            total_packets: 30,
            lan_packets: 20,
            local_packets: 10,
            rules: 4,
            backend: Some("nft".into()),
            ts: Some("2024-06-15 10:30:00".into()),
            device: Some("gw".into()),
            ip: Some("10.0.0.1".into()),
        };

        let view = StatusView::from_snapshot(&snap);

        assert_eq!(view.total, "1.50 KB");
        assert_eq!(view.lan, "1.00 KB");
        assert_eq!(view.local, "512 B");
        assert_eq!(view.lan_sub, "20 packets");
        assert_eq!(view.backend, "nft backend");
        assert_eq!(view.total_packets, "30");
        assert_eq!(view.device, "gw");
    }
}

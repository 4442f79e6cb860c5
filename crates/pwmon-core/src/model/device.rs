// ── Device roster views ──
//
// The grid of device cards and the options of the device selector, both
// rebuilt from scratch on every roster publish.

use pwmon_api::DeviceSummary;

use crate::format::{fmt_last_seen, human_bytes};

/// A device is online when it reported within this many seconds.
pub const ONLINE_WINDOW_SECS: i64 = 120;

/// Key used when the roster is empty or nothing is selected.
pub const DEFAULT_KEY: &str = "default";

/// Presence derived from the last ingest time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Presence {
    Online,
    Offline,
}

impl Presence {
    /// Online iff `now - received_at < 120`. A future timestamp counts as
    /// online.
    pub fn at(received_at: i64, now: i64) -> Self {
        if now.saturating_sub(received_at) < ONLINE_WINDOW_SECS {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Traffic scope shown on each card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Scope {
    Total,
    #[strum(serialize = "LAN")]
    Lan,
    Local,
}

impl Scope {
    pub const ALL: [Self; 3] = [Self::Total, Self::Lan, Self::Local];

    fn bytes(self, device: &DeviceSummary) -> u64 {
        match self {
            Self::Total => device.total_bytes,
            Self::Lan => device.lan_bytes,
            Self::Local => device.local_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMetric {
    pub scope: Scope,
    pub value: String,
}

/// One card of the device grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCard {
    pub key: String,
    pub title: String,
    /// `"{ip} · last Ns ago"`, or just the age when the ip is unknown.
    pub meta: String,
    pub presence: Presence,
    pub metrics: Vec<DeviceMetric>,
    pub selected: bool,
}

impl DeviceCard {
    pub fn build(device: &DeviceSummary, selected: &str, now: i64) -> Self {
        let last_seen = fmt_last_seen(device.received_at, now);
        let meta = match device.ip.as_deref() {
            Some(ip) => format!("{ip} · {last_seen}"),
            None => last_seen,
        };

        Self {
            key: device.key.clone(),
            title: device.label().to_owned(),
            meta,
            presence: Presence::at(device.received_at, now),
            metrics: Scope::ALL
                .into_iter()
                .map(|scope| DeviceMetric {
                    scope,
                    value: human_bytes(scope.bytes(device)),
                })
                .collect(),
            selected: device.key == selected,
        }
    }
}

/// The device grid, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceGrid {
    pub cards: Vec<DeviceCard>,
}

impl DeviceGrid {
    pub fn build(roster: &[DeviceSummary], selected: &str, now: i64) -> Self {
        Self {
            cards: roster
                .iter()
                .map(|device| DeviceCard::build(device, selected, now))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn online_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.presence.is_online())
            .count()
    }

    /// Index of the selected card, if it is on the roster.
    pub fn selected_index(&self) -> Option<usize> {
        self.cards.iter().position(|card| card.selected)
    }
}

/// One entry of the device selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOption {
    pub key: String,
    pub label: String,
}

/// Options of the device selector, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOptions {
    options: Vec<DeviceOption>,
}

impl DeviceOptions {
    /// One option per device, or a single synthetic `"default"` option when
    /// the roster is empty.
    pub fn from_roster(roster: &[DeviceSummary]) -> Self {
        if roster.is_empty() {
            return Self::default();
        }

        Self {
            options: roster
                .iter()
                .map(|device| DeviceOption {
                    key: device.key.clone(),
                    label: match device.ip.as_deref() {
                        Some(ip) => format!("{} ({ip})", device.label()),
                        None => device.label().to_owned(),
                    },
                })
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[DeviceOption] {
        &self.options
    }

    pub fn first_key(&self) -> &str {
        self.options.first().map_or(DEFAULT_KEY, |o| o.key.as_str())
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.options.iter().position(|o| o.key == key)
    }

    pub fn label_for(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.label.as_str())
    }

    /// Key after `current`, wrapping. Unknown keys restart at the first.
    pub fn next_key(&self, current: &str) -> &str {
        let idx = self
            .position(current)
            .map_or(0, |i| (i + 1) % self.options.len());
        self.key_at(idx)
    }

    /// Key before `current`, wrapping. Unknown keys restart at the last.
    pub fn prev_key(&self, current: &str) -> &str {
        let len = self.options.len();
        let idx = self
            .position(current)
            .map_or(len.saturating_sub(1), |i| (i + len - 1) % len);
        self.key_at(idx)
    }

    fn key_at(&self, idx: usize) -> &str {
        self.options
            .get(idx)
            .map_or(DEFAULT_KEY, |o| o.key.as_str())
    }
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            options: vec![DeviceOption {
                key: DEFAULT_KEY.into(),
                label: DEFAULT_KEY.into(),
            }],
        }
    }
}

//! Configuration for the pwmon dashboard.
//!
//! A TOML file in the platform config directory, overridden by `PWMON_*`
//! environment variables (`PWMON_COLLECTOR__URL`, `PWMON_UI__AUTOREFRESH`,
//! ...). Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use pwmon_core::TransportConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub collector: CollectorSection,

    #[serde(default)]
    pub ui: UiSection,
}

/// Where the collector lives and how patiently to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectorSection {
    /// Collector base URL (e.g., "http://127.0.0.1:8080").
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for CollectorSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSection {
    /// Start with the periodic refresh running.
    #[serde(default = "default_autorefresh")]
    pub autorefresh: bool,

    /// Device key to select at start-up instead of the first roster entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Log file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            autorefresh: default_autorefresh(),
            device: None,
            log_file: None,
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_autorefresh() -> bool {
    true
}

impl Config {
    /// Check values a collector connection depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collector_url()?;
        if self.collector.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "collector.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Parsed collector base URL. Only `http` and `https` are accepted.
    pub fn collector_url(&self) -> Result<Url, ConfigError> {
        let url: Url = self
            .collector
            .url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "collector.url".into(),
                reason: format!("{e}: {}", self.collector.url),
            })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Validation {
                field: "collector.url".into(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// HTTP transport settings for the collector client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(Duration::from_secs(self.collector.timeout_secs))
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "pwmon", "pwmon").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pwmon");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from `path` + environment. A missing file is not an
/// error; defaults apply.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PWMON_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent
/// directories.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// Loading reads the process environment, so every test that loads runs
// inside a `figment::Jail`, which serializes them.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        figment::Jail::expect_with(|_jail| {
            let dir = tempfile::tempdir().unwrap();
            let cfg = load_from(&dir.path().join("absent.toml")).unwrap();

            assert_eq!(cfg.collector.url, "http://127.0.0.1:8080");
            assert_eq!(cfg.collector.timeout_secs, 10);
            assert!(cfg.ui.autorefresh);
            assert!(cfg.ui.device.is_none());
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[collector]\nurl = \"http://10.0.0.5:9000/pw\"\n\n[ui]\nautorefresh = false\ndevice = \"gw\"",
            )?;

            let cfg = load_from(Path::new("config.toml")).unwrap();

            assert_eq!(cfg.collector.url, "http://10.0.0.5:9000/pw");
            assert_eq!(cfg.collector.timeout_secs, 10);
            assert!(!cfg.ui.autorefresh);
            assert_eq!(cfg.ui.device.as_deref(), Some("gw"));
            Ok(())
        });
    }

    #[test]
    fn malformed_file_is_an_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[collector\nurl = ")?;

            assert!(matches!(
                load_from(Path::new("config.toml")),
                Err(ConfigError::Figment(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[collector]\nurl = \"http://file:1\"")?;
            jail.set_env("PWMON_COLLECTOR__URL", "http://env:2");
            jail.set_env("PWMON_COLLECTOR__TIMEOUT_SECS", "3");
            jail.set_env("PWMON_UI__AUTOREFRESH", "false");

            let cfg = load_from(Path::new("config.toml")).unwrap();

            assert_eq!(cfg.collector.url, "http://env:2");
            assert_eq!(cfg.collector.timeout_secs, 3);
            assert!(!cfg.ui.autorefresh);
            Ok(())
        });
    }

    #[test]
    fn save_then_load() {
        figment::Jail::expect_with(|_jail| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("config.toml");

            let mut cfg = Config::default();
            cfg.ui.autorefresh = false;
            cfg.ui.device = Some("ap".into());
            save_to(&cfg, &path).unwrap();

            assert_eq!(load_from(&path).unwrap(), cfg);
            Ok(())
        });
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.validate().is_ok());

        cfg.collector.timeout_secs = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "collector.timeout_secs"
        ));

        cfg.collector.timeout_secs = 5;
        cfg.collector.url = "not a url".into();
        assert!(cfg.validate().is_err());

        cfg.collector.url = "ftp://host".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn transport_uses_timeout() {
        let mut cfg = Config::default();
        cfg.collector.timeout_secs = 42;

        assert_eq!(cfg.transport().timeout, Duration::from_secs(42));
    }
}

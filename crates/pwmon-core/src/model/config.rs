// ── Collector configuration form ──

use std::fmt;

use pwmon_api::{CollectorConfig, ConfigUpdate};
use secrecy::SecretString;

/// Interval used when the collector reports none or the form holds no
/// usable number.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Editable state of the configuration form.
///
/// Fields hold raw text as typed; coercion happens in [`to_update`].
///
/// [`to_update`]: ConfigForm::to_update
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub router_url: String,
    pub router_user: String,
    /// Write-only. Always empty after a load.
    pub router_pass: String,
    pub interval: String,
    pub enabled: bool,
}

impl ConfigForm {
    /// Populate from the collector's stored configuration.
    pub fn from_config(cfg: &CollectorConfig) -> Self {
        let interval = cfg
            .interval
            .filter(|&secs| secs != 0)
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        Self {
            router_url: cfg.router_url.clone().unwrap_or_default(),
            router_user: cfg.router_user.clone().unwrap_or_default(),
            router_pass: String::new(),
            interval: interval.to_string(),
            enabled: cfg.enabled,
        }
    }

    /// Build the `POST /api/config` body.
    ///
    /// URL and user are trimmed, the password is sent verbatim, and the
    /// interval falls back to 10 when empty or not an unsigned integer.
    pub fn to_update(&self) -> ConfigUpdate {
        ConfigUpdate {
            router_url: self.router_url.trim().to_owned(),
            router_user: self.router_user.trim().to_owned(),
            router_pass: SecretString::from(self.router_pass.clone()),
            interval: parse_interval(&self.interval),
            enabled: self.enabled,
        }
    }
}

impl fmt::Debug for ConfigForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigForm")
            .field("router_url", &self.router_url)
            .field("router_user", &self.router_user)
            .field("router_pass", &"[REDACTED]")
            .field("interval", &self.interval)
            .field("enabled", &self.enabled)
            .finish()
    }
}

fn parse_interval(text: &str) -> u64 {
    text.trim()
        .parse::<u64>()
        .unwrap_or(DEFAULT_INTERVAL_SECS)
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn load_clears_password_and_defaults_interval() {
        let form = ConfigForm::from_config(&CollectorConfig {
            router_url: Some("http://r".into()),
            router_user: None,
            interval: None,
            enabled: true,
        });

        assert_eq!(form.router_url, "http://r");
        assert_eq!(form.router_user, "");
        assert_eq!(form.router_pass, "");
        assert_eq!(form.interval, "10");
        assert!(form.enabled);
    }

    #[test]
    fn zero_interval_loads_as_default() {
        let form = ConfigForm::from_config(&CollectorConfig {
            interval: Some(0),
            ..CollectorConfig::default()
        });
        assert_eq!(form.interval, "10");

        let form = ConfigForm::from_config(&CollectorConfig {
            interval: Some(30),
            ..CollectorConfig::default()
        });
        assert_eq!(form.interval, "30");
    }

    #[test]
    fn update_trims_text_but_not_password() {
        let form = ConfigForm {
            router_url: "  http://r/stats \n".into(),
            router_user: " root ".into(),
            router_pass: " s3cret ".into(),
            interval: " 15 ".into(),
            enabled: false,
        };

        let update = form.to_update();

        assert_eq!(update.router_url, "http://r/stats");
        assert_eq!(update.router_user, "root");
        assert_eq!(update.router_pass.expose_secret(), " s3cret ");
        assert_eq!(update.interval, 15);
        assert!(!update.enabled);
    }

    #[test]
    fn interval_coercion() {
        assert_eq!(parse_interval(""), 10);
        assert_eq!(parse_interval("   "), 10);
        assert_eq!(parse_interval("abc"), 10);
        assert_eq!(parse_interval("-5"), 10);
        assert_eq!(parse_interval("0"), 0);
        assert_eq!(parse_interval("60"), 60);
    }

    #[test]
    fn debug_hides_password() {
        let form = ConfigForm {
            router_pass: "hunter2".into(),
            ..ConfigForm::default()
        };

        assert!(!format!("{form:?}").contains("hunter2"));
    }
}

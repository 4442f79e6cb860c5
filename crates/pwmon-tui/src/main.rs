//! `pwmon-tui` - terminal dashboard for a pwmon traffic collector.
//!
//! Screens are navigable via number keys (1-3): Dashboard, Devices and
//! Config. Data comes from `pwmon-core`'s [`Dashboard`] engine; a data
//! bridge task streams its surfaces into the TUI action loop.
//!
//! Logs are written to a file (default `/tmp/pwmon-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use pwmon_config::Config;
use pwmon_core::{CollectorClient, Dashboard};

use crate::app::App;

const DEFAULT_LOG_FILE: &str = "/tmp/pwmon-tui.log";

/// Terminal dashboard for a pwmon traffic collector.
#[derive(Parser, Debug)]
#[command(name = "pwmon-tui", version, about)]
struct Cli {
    /// Collector URL (e.g., http://127.0.0.1:8080)
    #[arg(short = 'u', long, env = "PWMON_URL")]
    url: Option<Url>,

    /// Device key to select on start-up
    #[arg(short = 'd', long)]
    device: Option<String>,

    /// Start with autorefresh paused (toggle with `a`)
    #[arg(long)]
    no_autorefresh: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// Log file path (defaults to /tmp/pwmon-tui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout/stderr belong to the TUI. The returned
/// guard must live as long as the app so logs get flushed.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pwmon_tui={log_level},pwmon_core={log_level},pwmon_api={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("pwmon-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// File and environment first, then command-line flags on top.
fn resolve_config(cli: &Cli, path: &Path) -> Result<Config> {
    let mut cfg = pwmon_config::load_from(path)?;

    if let Some(url) = &cli.url {
        cfg.collector.url = url.to_string();
    }
    if let Some(device) = &cli.device {
        cfg.ui.device = Some(device.clone());
    }
    if cli.no_autorefresh {
        cfg.ui.autorefresh = false;
    }
    if let Some(log_file) = &cli.log_file {
        cfg.ui.log_file = Some(log_file.clone());
    }

    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched
    tui::install_hooks()?;

    let path = cli.config.clone().unwrap_or_else(pwmon_config::config_path);
    let cfg = resolve_config(&cli, &path)?;

    if cli.write_config {
        pwmon_config::save_to(&cfg, &path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let log_file = cfg
        .ui
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let _log_guard = setup_tracing(&log_file, cli.verbose);

    info!(
        url = %cfg.collector.url,
        config = %path.display(),
        "starting pwmon-tui"
    );

    let client = CollectorClient::new(cfg.collector_url()?, &cfg.transport())?;
    let dashboard = Dashboard::new(client);
    if let Some(device) = &cfg.ui.device {
        dashboard.select_device(device.clone());
    }

    let mut app = App::new(dashboard, cfg.ui.autorefresh);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "pwmon-tui",
            "--url",
            "http://10.0.0.2:8080",
            "--device",
            "gw",
            "--no-autorefresh",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.url.unwrap().as_str(), "http://10.0.0.2:8080/");
        assert_eq!(cli.device.as_deref(), Some("gw"));
        assert!(cli.no_autorefresh);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_rejects_malformed_url() {
        assert!(Cli::try_parse_from(["pwmon-tui", "--url", "not a url"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[collector]\nurl = \"http://file:1\"\n\n[ui]\nautorefresh = true\n",
            )?;
            let cli = Cli::try_parse_from([
                "pwmon-tui",
                "--url",
                "http://flag:2",
                "--no-autorefresh",
            ])
            .unwrap();

            let cfg = resolve_config(&cli, Path::new("config.toml")).unwrap();

            assert_eq!(cfg.collector.url, "http://flag:2/");
            assert!(!cfg.ui.autorefresh);
            Ok(())
        });
    }

    #[test]
    fn invalid_file_url_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[collector]\nurl = \"ftp://x\"\n")?;
            let cli = Cli::try_parse_from(["pwmon-tui"]).unwrap();

            assert!(resolve_config(&cli, Path::new("config.toml")).is_err());
            Ok(())
        });
    }
}

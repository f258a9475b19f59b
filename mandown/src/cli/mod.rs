//! CLI module for mandown
//!
//! Provides the command-line interface for running the bot.

pub mod check;
pub mod poll;
pub mod serve;

use crate::config::Settings;
use crate::notify::TelegramNotifier;
use crate::probe::Prober;
use crate::shutdown::ShutdownController;
use crate::store::RecordStore;
use crate::AppState;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

/// sendMessage のタイムアウト（秒）
const NOTIFY_TIMEOUT_SECS: u64 = 30;

/// ManDown - get notified when your sites go down
#[derive(Parser, Debug)]
#[command(name = "mandown")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    MANDOWN_TELEGRAM_TOKEN       Bot API token (required for serve/poll)
    MANDOWN_TELEGRAM_API_BASE    Bot API base URL (default: https://api.telegram.org)
    MANDOWN_FILE                 Record file (default: db.csv)
    MANDOWN_HOST                 Bind address (default: 0.0.0.0)
    MANDOWN_PORT                 Listen port (default: 8080)
    MANDOWN_POLL_INTERVAL_SECS   Re-check interval, 0 disables the timer (default: 300)
    MANDOWN_PROBE_TIMEOUT_SECS   Probe timeout (default: 180)
    MANDOWN_PROBE_CONCURRENCY    Max in-flight probes (default: unlimited)
    MANDOWN_CONFIG               YAML config file (default: config.yaml)
    MANDOWN_LOG_LEVEL            Log level (default: info)
    MANDOWN_LOG_DIR              Also write daily log files to this directory
"#)]
pub struct Cli {
    /// Subcommand to execute (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the webhook server and the re-check timer
    Serve(serve::ServeArgs),
    /// Run a single re-check pass and exit
    Poll,
    /// Probe URLs and print the results as JSON
    Check(check::CheckArgs),
}

/// 設定からプローブを作る
pub(crate) fn build_prober(settings: &Settings) -> anyhow::Result<Prober> {
    let prober = Prober::new(settings.probe_timeout)?;
    Ok(prober.with_concurrency_limit(settings.probe_concurrency.unwrap_or(0)))
}

/// 設定からアプリケーション状態を組み立てる
pub(crate) fn build_state(settings: &Settings, shutdown: ShutdownController) -> anyhow::Result<AppState> {
    let token = settings
        .telegram_token
        .as_deref()
        .context("MANDOWN_TELEGRAM_TOKEN is not set")?;

    let notify_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(NOTIFY_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")?;
    let notifier = TelegramNotifier::new(notify_client, &settings.telegram_api_base, token);

    Ok(AppState::new(
        RecordStore::new(&settings.db_file),
        build_prober(settings)?,
        Arc::new(notifier),
        settings.baseline_sites.clone(),
        shutdown,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            host: "127.0.0.1".to_string(),
            port: 0,
            telegram_token: None,
            telegram_api_base: "http://127.0.0.1:1".to_string(),
            db_file: "db.csv".to_string(),
            poll_interval: Duration::ZERO,
            probe_timeout: Duration::from_secs(1),
            probe_concurrency: None,
            baseline_sites: Vec::new(),
        }
    }

    #[test]
    fn test_parse_serve_args() {
        let cli = Cli::try_parse_from([
            "mandown", "serve", "--port", "9000", "--file", "/tmp/x.csv", "--interval", "0",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.file.as_deref(), Some("/tmp/x.csv"));
                assert_eq!(args.interval, Some(0));
                assert_eq!(args.host, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["mandown"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_check_requires_url() {
        assert!(Cli::try_parse_from(["mandown", "check"]).is_err());
        let cli = Cli::try_parse_from(["mandown", "check", "aaa.com", "bbb.org"]).unwrap();
        match cli.command {
            Some(Commands::Check(args)) => assert_eq!(args.urls, vec!["aaa.com", "bbb.org"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_build_state_requires_token() {
        let err = build_state(&settings(), ShutdownController::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("MANDOWN_TELEGRAM_TOKEN"));

        let mut with_token = settings();
        with_token.telegram_token = Some("123:abc".to_string());
        assert!(build_state(&with_token, ShutdownController::new()).is_ok());
    }
}

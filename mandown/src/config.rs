//! Configuration via environment variables
//!
//! `MANDOWN_*` variables take precedence; the unprefixed names used by older
//! deployments (`TELEGRAM_TOKEN`, `FILE`, `POLL_INTERVAL`, `PORT`) are still
//! honored with a deprecation warning. Environment values override the YAML
//! config file.

use crate::notify::DEFAULT_TELEGRAM_API_BASE;
use mandown_common::config::BotConfig;
use mandown_common::error::MandownResult;
use std::path::PathBuf;
use std::time::Duration;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Get an environment variable with fallback to a deprecated name
///
/// If only the old name is set, its value is returned and a deprecation
/// warning is logged.
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback, or a default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` when neither is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// 設定ファイルのパス（`MANDOWN_CONFIG`、未設定なら `config.yaml`）
pub fn config_path() -> PathBuf {
    std::env::var("MANDOWN_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// 実行時設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// バインドアドレス
    pub host: String,
    /// 待ち受けポート
    pub port: u16,
    /// Bot APIトークン（serve/pollで必須）
    pub telegram_token: Option<String>,
    /// Bot APIベースURL
    pub telegram_api_base: String,
    /// レコードファイル
    pub db_file: String,
    /// 再チェック間隔（0で無効）
    pub poll_interval: Duration,
    /// プローブのタイムアウト
    pub probe_timeout: Duration,
    /// 同時プローブ数の上限
    pub probe_concurrency: Option<usize>,
    /// ベースラインサイト
    pub baseline_sites: Vec<String>,
}

impl Settings {
    /// 設定ファイルを読み込み、環境変数で上書きする
    pub fn load() -> MandownResult<Self> {
        let file = BotConfig::load(config_path())?;
        Ok(Self::from_env(file))
    }

    /// ファイル設定に環境変数を重ねる
    pub fn from_env(file: BotConfig) -> Self {
        let probe_concurrency = get_env_parse::<usize>("MANDOWN_PROBE_CONCURRENCY")
            .or(file.probe_concurrency)
            .filter(|limit| *limit > 0);

        Self {
            host: std::env::var("MANDOWN_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: get_env_with_fallback_parse("MANDOWN_PORT", "PORT", DEFAULT_PORT),
            telegram_token: get_env_with_fallback("MANDOWN_TELEGRAM_TOKEN", "TELEGRAM_TOKEN")
                .filter(|token| !token.trim().is_empty()),
            telegram_api_base: std::env::var("MANDOWN_TELEGRAM_API_BASE")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_BASE.to_string()),
            db_file: get_env_with_fallback_or("MANDOWN_FILE", "FILE", &file.db_file),
            poll_interval: Duration::from_secs(get_env_with_fallback_parse(
                "MANDOWN_POLL_INTERVAL_SECS",
                "POLL_INTERVAL",
                file.poll_interval_secs,
            )),
            probe_timeout: Duration::from_secs(
                get_env_parse("MANDOWN_PROBE_TIMEOUT_SECS").unwrap_or(file.probe_timeout_secs),
            ),
            probe_concurrency,
            baseline_sites: file.baseline_sites,
        }
    }

    /// `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

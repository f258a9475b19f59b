//! 設定管理
//!
//! BotConfig（YAML設定ファイル）

use crate::error::{MandownError, MandownResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ボット設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// ベースラインサイト。1つも到達できない回は再チェックを行わない (デフォルト: 空 = 無効)
    #[serde(default)]
    pub baseline_sites: Vec<String>,

    /// レコードファイル (デフォルト: "db.csv")
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// 再チェック間隔（秒）。0でタイマー無効 (デフォルト: 300)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// プローブのタイムアウト（秒）(デフォルト: 180)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// 同時プローブ数の上限 (デフォルト: 無制限)
    #[serde(default)]
    pub probe_concurrency: Option<usize>,
}

fn default_db_file() -> String {
    "db.csv".to_string()
}

fn default_poll_interval() -> u64 {
    300
}

fn default_probe_timeout() -> u64 {
    180
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            baseline_sites: Vec::new(),
            db_file: default_db_file(),
            poll_interval_secs: default_poll_interval(),
            probe_timeout_secs: default_probe_timeout(),
            probe_concurrency: None,
        }
    }
}

impl BotConfig {
    /// YAML文字列から読み込む
    pub fn from_yaml_str(contents: &str) -> MandownResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(|e| MandownError::Config(e.to_string()))
    }

    /// 設定ファイルを読み込む。ファイルが無ければデフォルト値
    pub fn load(path: impl AsRef<Path>) -> MandownResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MandownError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&contents)
    }
}

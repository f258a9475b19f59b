//! ログ初期化
//!
//! - レベル: `MANDOWN_LOG_LEVEL`、未設定なら `RUST_LOG`、どちらも無ければ `info`
//! - `MANDOWN_LOG_DIR` が設定されていれば日次ローテーションのファイル出力を追加

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログファイル名の接頭辞
const LOG_FILE_PREFIX: &str = "mandown.log";

/// ログレベル指定を決める
fn filter_directive() -> String {
    std::env::var("MANDOWN_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// グローバルsubscriberを登録する
///
/// ファイル出力を有効にした場合は返り値のガードをプロセス終了まで保持すること。
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(filter_directive()).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match std::env::var("MANDOWN_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

//! serve サブコマンド
//!
//! Webhookサーバーと再チェックタイマーを起動します。

use crate::config::Settings;
use crate::server;
use crate::shutdown::ShutdownController;
use clap::Args;
use std::time::Duration;
use tracing::{info, warn};

/// 停止時に再チェックループの終了を待つ最大時間
const POLL_LOOP_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// serve サブコマンドの引数（未指定なら環境変数・設定ファイルの値）
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Bind address
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Record file
    #[arg(short, long)]
    pub file: Option<String>,

    /// Re-check interval in seconds (0 disables the timer)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

impl ServeArgs {
    /// 引数で設定を上書きする
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(file) = &self.file {
            settings.db_file = file.clone();
        }
        if let Some(interval) = self.interval {
            settings.poll_interval = Duration::from_secs(interval);
        }
    }
}

/// サーバーを起動し、停止シグナルまで待つ
pub async fn execute(args: &ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    args.apply(&mut settings);

    let shutdown = ShutdownController::new();
    let state = super::build_state(&settings, shutdown.clone())?;

    info!(
        file = %settings.db_file,
        poll_interval_secs = settings.poll_interval.as_secs(),
        baseline_sites = settings.baseline_sites.len(),
        "Starting ManDown"
    );

    let poll_loop = if settings.poll_interval.is_zero() {
        info!("Poll timer disabled, use GET /poll to trigger re-checks");
        None
    } else {
        Some(
            state
                .poller
                .clone()
                .start(settings.poll_interval, shutdown.clone()),
        )
    };

    let result = server::run(state, &settings.bind_addr()).await;
    shutdown.request_shutdown();

    if let Some(handle) = poll_loop {
        if tokio::time::timeout(POLL_LOOP_STOP_TIMEOUT, handle).await.is_err() {
            warn!("Poll loop did not stop in time");
        }
    }

    result
}

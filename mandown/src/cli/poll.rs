//! poll サブコマンド
//!
//! 再チェックを1回実行し、結果をJSONで出力します（cron等からの起動用）。

use crate::config::Settings;
use crate::shutdown::ShutdownController;

/// 1回分の再チェックを実行し、通知の送信完了まで待つ
pub async fn execute(settings: Settings) -> anyhow::Result<()> {
    let state = super::build_state(&settings, ShutdownController::new())?;
    let report = state.poller.run_once_and_flush().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

//! ManDown
//!
//! サイトのステータス変化を通知するチャットボット

/// HTTP API（Webhook、再チェック、稼働確認）
pub mod api;

/// コマンド処理
pub mod bot;

/// CLIインターフェース
pub mod cli;

/// チャットコマンドの解析
pub mod commands;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// ユーザー向けメッセージ
pub mod messages;

/// 通知送信
pub mod notify;

/// 再チェック（ポーリング）
pub mod poll;

/// バルクヘルスプローブ
pub mod probe;

/// 再チェック結果の突き合わせ
pub mod reconcile;

/// URL正規化
pub mod sanitize;

/// axumサーバー起動
pub mod server;

/// Shutdown controller
pub mod shutdown;

/// CSVレコードストア
pub mod store;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// コマンドハンドラ
    pub bot: bot::Bot,
    /// 再チェック実行器
    pub poller: poll::Poller,
    /// 通知送信先
    pub notifier: Arc<dyn notify::Notifier>,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}

impl AppState {
    /// ストア・プローブ・通知先をボットと再チェック実行器で共有して状態を組み立てる
    pub fn new(
        store: store::RecordStore,
        prober: probe::Prober,
        notifier: Arc<dyn notify::Notifier>,
        baseline_sites: Vec<String>,
        shutdown: shutdown::ShutdownController,
    ) -> Self {
        let bot = bot::Bot::new(store.clone(), prober.clone());
        let poller = poll::Poller::new(store, prober, notifier.clone())
            .with_baseline_sites(baseline_sites);
        Self {
            bot,
            poller,
            notifier,
            shutdown,
        }
    }
}

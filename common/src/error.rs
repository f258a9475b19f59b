//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! 入力エラー（URL不正）はユーザーへの返信に、ストレージ・通知エラーは
//! ログとHTTPレスポンスに使う。通信エラーはエラー型ではなく疑似ステータス1で表す。

use thiserror::Error;

/// URL正規化の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// 空入力
    #[error("web: input is empty")]
    Empty,

    /// URLとして解釈できない入力
    #[error("web: input is incorrect")]
    Invalid,
}

/// ボット全体のエラー型
#[derive(Debug, Error)]
pub enum MandownError {
    /// 入力エラー
    #[error(transparent)]
    Input(#[from] SanitizeError),

    /// 永続化ファイルの読み書きエラー
    #[error("Storage error: {0}")]
    Storage(String),

    /// 通知送信エラー
    #[error("Notification error: {0}")]
    Notify(String),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(String),

    /// 不正なリクエスト
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 内部エラー
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MandownError {
    /// Returns a safe error message for external clients.
    ///
    /// File paths and upstream error details stay in the server log.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Input(_) => "Invalid URL",
            Self::Storage(_) => "Storage error",
            Self::Notify(_) => "Notification service unavailable",
            Self::Config(_) => "Configuration error",
            Self::BadRequest(_) => "Bad request",
            Self::Internal(_) => "Internal server error",
        }
    }
}

impl From<std::io::Error> for MandownError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result型エイリアス
pub type MandownResult<T> = Result<T, MandownError>;

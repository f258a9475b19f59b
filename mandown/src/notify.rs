//! 通知送信
//!
//! チャットへのメッセージ送信。送信は待たずにバックグラウンドで行い、
//! 失敗はログに残すだけにする。

use async_trait::async_trait;
use mandown_common::error::{MandownError, MandownResult};
use mandown_common::protocol::SendMessage;
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// デフォルトのBot APIベースURL
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// 送信するメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    /// 宛先チャットID
    pub chat_id: i64,
    /// 本文（Markdown）
    pub text: String,
    /// 返信先メッセージID
    pub reply_to: Option<i64>,
}

/// 通知の送信先
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 1件送信する
    async fn send(&self, outgoing: Outgoing) -> MandownResult<()>;
}

/// Bot API の sendMessage で送信する
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, api_base: &str, token: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, outgoing: Outgoing) -> MandownResult<()> {
        let body = SendMessage {
            chat_id: outgoing.chat_id,
            text: outgoing.text,
            parse_mode: Some("Markdown".to_string()),
            disable_web_page_preview: true,
            reply_to_message_id: outgoing.reply_to,
        };

        // URLにトークンが含まれるため、エラーからURLを外す
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| MandownError::Notify(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MandownError::Notify(format!(
                "sendMessage returned {}",
                status.as_u16()
            )));
        }

        debug!(chat_id = body.chat_id, "Message sent");
        Ok(())
    }
}

/// 送信をバックグラウンドタスクに任せる
pub fn dispatch(notifier: Arc<dyn Notifier>, outgoing: Outgoing) -> JoinHandle<()> {
    tokio::spawn(async move {
        let chat_id = outgoing.chat_id;
        if let Err(e) = notifier.send(outgoing).await {
            warn!(chat_id = chat_id, error = %e, "Failed to send message");
        }
    })
}

/// 複数件を順序どおりに1タスクで送る
pub fn dispatch_all(notifier: Arc<dyn Notifier>, outgoing: Vec<Outgoing>) -> JoinHandle<()> {
    tokio::spawn(async move {
        for message in outgoing {
            let chat_id = message.chat_id;
            if let Err(e) = notifier.send(message).await {
                warn!(chat_id = chat_id, error = %e, "Failed to send message");
            }
        }
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// 送信内容を記録するだけの Notifier
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<Outgoing>>,
    }

    impl RecordingNotifier {
        pub async fn sent(&self) -> Vec<Outgoing> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, outgoing: Outgoing) -> MandownResult<()> {
            self.sent.lock().await.push(outgoing);
            Ok(())
        }
    }
}

//! 通信プロトコル定義
//!
//! チャットWebhook（受信）、sendMessage（送信）、ポーリング結果のJSON表現

use serde::{Deserialize, Serialize};

/// Webhookで受信するアップデート
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Update {
    /// アップデートID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_id: Option<i64>,
    /// メッセージ（編集通知などでは欠落する）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// チャットメッセージ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// メッセージID
    pub message_id: i64,
    /// 本文（スタンプ等では欠落する）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 送信元チャット
    pub chat: Chat,
    /// 送信者
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
}

/// チャット
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// チャットID（レコードの所有ユーザーとして使う）
    pub id: i64,
}

/// 送信者
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// ユーザーID
    pub id: i64,
    /// 名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

/// sendMessage リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessage {
    /// 宛先チャットID
    pub chat_id: i64,
    /// 本文
    pub text: String,
    /// 書式（"Markdown"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    /// リンクプレビューを無効化するか
    #[serde(default)]
    pub disable_web_page_preview: bool,
    /// 返信先メッセージID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

/// 1回のポーリング（再チェック）の結果
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollReport {
    /// ベースライン到達不可でスキップしたか
    pub skipped: bool,
    /// 読み込んだレコード数
    pub records: usize,
    /// プローブしたユニークURL数
    pub probed: usize,
    /// ステータスが変化したレコード数
    pub changed: usize,
    /// 一時的な通信エラーとして無視したレコード数
    pub suppressed: usize,
    /// 送信キューに入れた通知数
    pub notified: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_deserialization() {
        let json = r#"{
            "update_id": 10,
            "message": {
                "message_id": 42,
                "text": "/track telegram.org",
                "chat": {"id": 1001},
                "from": {"id": 1001, "first_name": "Ada", "is_bot": false}
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();

        assert_eq!(message.message_id, 42);
        assert_eq!(message.text.as_deref(), Some("/track telegram.org"));
        assert_eq!(message.chat.id, 1001);
        assert_eq!(message.from.unwrap().first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_update_without_message() {
        let update: Update = serde_json::from_str(r#"{"update_id": 11}"#).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn test_send_message_serialization_skips_empty_reply() {
        let body = SendMessage {
            chat_id: 5,
            text: "hi".to_string(),
            parse_mode: Some("Markdown".to_string()),
            disable_web_page_preview: true,
            reply_to_message_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["chat_id"], 5);
        assert_eq!(json["parse_mode"], "Markdown");
        assert!(json.get("reply_to_message_id").is_none());
    }
}

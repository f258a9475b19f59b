//! 共通型定義
//!
//! 監視対象レコード（Record）とプローブ結果（Health）

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// URLとして解釈できなかったサイトに割り当てる疑似ステータス
pub const STATUS_MALFORMED: u16 = 0;

/// 通信エラー（DNS失敗、接続拒否、タイムアウト等）に割り当てる疑似ステータス
pub const STATUS_UNREACHABLE: u16 = 1;

/// 永続化ファイル上のタイムスタンプ書式
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// 監視レコード
///
/// (site, user_id) の組がキー。ファイル上は
/// `site,user_id,message_id,time,status` の順で1行に並ぶ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 正規化済みURL（`http://host` または `https://host`）
    pub site: String,
    /// 所有ユーザー（チャットID）
    pub user_id: i64,
    /// 通知時に返信するメッセージID
    pub message_id: i64,
    /// 最後にステータスが変化した時刻
    #[serde(with = "record_time")]
    pub time: DateTime<Utc>,
    /// 最後に観測したステータス
    pub status: u16,
}

impl Record {
    /// 新しいレコードを作成（時刻は秒精度に丸める）
    pub fn new(
        site: impl Into<String>,
        user_id: i64,
        message_id: i64,
        time: DateTime<Utc>,
        status: u16,
    ) -> Self {
        Self {
            site: site.into(),
            user_id,
            message_id,
            time: time.trunc_subsecs(0),
            status,
        }
    }

    /// (site, user) キーが一致するか
    pub fn is_key(&self, site: &str, user_id: i64) -> bool {
        self.site == site && self.user_id == user_id
    }
}

/// 単一サイトのプローブ結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// プローブしたURL（入力のまま）
    pub site: String,
    /// HTTPステータス、または疑似ステータス 0/1
    pub status: u16,
    /// 診断メッセージ（失敗時のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc: Option<String>,
}

impl Health {
    /// HTTPレスポンスを受け取れた結果
    pub fn responded(site: impl Into<String>, status: u16) -> Self {
        Self {
            site: site.into(),
            status,
            misc: None,
        }
    }

    /// URLとして解釈できなかった結果
    pub fn malformed(site: impl Into<String>, misc: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            status: STATUS_MALFORMED,
            misc: Some(misc.into()),
        }
    }

    /// 通信エラーの結果
    pub fn unreachable(site: impl Into<String>, misc: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            status: STATUS_UNREACHABLE,
            misc: Some(misc.into()),
        }
    }

    /// ボットが監視対象として受け付けるか（疑似ステータス以外）
    pub fn is_accepted(&self) -> bool {
        self.status != STATUS_MALFORMED && self.status != STATUS_UNREACHABLE
    }
}

mod record_time {
    use super::TIME_LAYOUT;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(TIME_LAYOUT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIME_LAYOUT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

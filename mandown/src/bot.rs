//! コマンド処理
//!
//! 受信したメッセージを解釈し、ストアとプローブを操作して返信文を作る。

use crate::commands::Command;
use crate::messages;
use crate::probe::Prober;
use crate::sanitize::sanitize;
use crate::store::RecordStore;
use chrono::Utc;
use mandown_common::error::MandownResult;
use mandown_common::protocol::Message;
use mandown_common::types::Record;
use tracing::{debug, info};

/// コマンドハンドラ
#[derive(Clone)]
pub struct Bot {
    store: RecordStore,
    prober: Prober,
}

impl Bot {
    pub fn new(store: RecordStore, prober: Prober) -> Self {
        Self { store, prober }
    }

    /// メッセージを処理して返信文を順に返す
    ///
    /// 入力エラーは返信文になる。ストレージエラーのみ `Err` で返す。
    pub async fn handle(&self, message: &Message) -> MandownResult<Vec<String>> {
        let text = message.text.as_deref().unwrap_or_default();
        let user_id = message.chat.id;
        let command = Command::parse(text);
        debug!(user_id = user_id, command = ?command, "Handling command");

        let replies = match command {
            Command::Start | Command::Help => {
                let first_name = message.from.as_ref().and_then(|u| u.first_name.as_deref());
                vec![messages::help(first_name)]
            }
            Command::About => vec![messages::about()],
            Command::List => {
                let sites: Vec<String> = self
                    .store
                    .list_by_user(user_id)
                    .await?
                    .into_iter()
                    .map(|record| record.site)
                    .collect();
                vec![messages::list(&sites)]
            }
            Command::Clear => {
                let removed = self.store.clear_user(user_id).await?;
                info!(user_id = user_id, removed = removed, "Cleared tracked sites");
                vec![messages::all_clear()]
            }
            Command::Track(arg) => self.track(&arg, user_id, message.message_id).await?,
            Command::Untrack(arg) => self.untrack(&arg, user_id).await?,
            Command::Unknown => vec![messages::unknown()],
        };
        Ok(replies)
    }

    async fn track(&self, arg: &str, user_id: i64, message_id: i64) -> MandownResult<Vec<String>> {
        let sanitized = match sanitize(arg) {
            Ok(sanitized) => sanitized,
            Err(e) => return Ok(vec![messages::input_error(&e)]),
        };

        let candidates: Vec<&str> = sanitized.candidates().collect();
        let results = self.prober.check_bulk(&candidates).await;

        let mut replies = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let Some(health) = results.iter().find(|h| h.site == candidate) else {
                continue;
            };
            replies.push(messages::status(
                &health.site,
                health.status,
                health.misc.as_deref(),
            ));

            if health.is_accepted() {
                let record = Record::new(candidate, user_id, message_id, Utc::now(), health.status);
                if self.store.put(record).await? {
                    info!(user_id = user_id, site = candidate, status = health.status, "Tracking site");
                }
            }
        }
        Ok(replies)
    }

    async fn untrack(&self, arg: &str, user_id: i64) -> MandownResult<Vec<String>> {
        let sanitized = match sanitize(arg) {
            Ok(sanitized) => sanitized,
            Err(e) => return Ok(vec![messages::input_error(&e)]),
        };

        for candidate in sanitized.candidates() {
            let removed = self.store.delete(candidate, user_id).await?;
            if removed > 0 {
                info!(user_id = user_id, site = candidate, "Untracked site");
            }
        }
        Ok(vec![messages::removed()])
    }
}

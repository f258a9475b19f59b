//! Webhook API
//!
//! POST /hook でチャットのアップデートを受け取り、返信を送る。

use crate::api::error::AppError;
use crate::notify::{dispatch_all, Outgoing};
use crate::AppState;
use axum::{extract::State, Json};
use mandown_common::protocol::Update;
use serde_json::{json, Value};
use tracing::debug;

/// POST /hook
///
/// 本文のないアップデートは何もせず 200 を返す。
pub async fn receive_update(
    State(state): State<AppState>,
    Json(update): Json<Update>,
) -> Result<Json<Value>, AppError> {
    let Some(message) = update.message.filter(|message| message.text.is_some()) else {
        debug!(update_id = ?update.update_id, "Ignoring update without text");
        return Ok(Json(json!({ "ok": true })));
    };

    let replies = state.bot.handle(&message).await?;

    let outgoing = replies
        .into_iter()
        .map(|text| Outgoing {
            chat_id: message.chat.id,
            text,
            reply_to: Some(message.message_id),
        })
        .collect();
    dispatch_all(state.notifier.clone(), outgoing);

    Ok(Json(json!({ "ok": true })))
}

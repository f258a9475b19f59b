//! 再チェック・稼働確認 API

use crate::api::error::AppError;
use crate::AppState;
use axum::{extract::State, Json};
use mandown_common::protocol::PollReport;
use serde_json::{json, Value};

/// GET /poll
///
/// 再チェックを1回実行し、結果を返す（完了まで応答しない）。
pub async fn run_poll(State(state): State<AppState>) -> Result<Json<PollReport>, AppError> {
    let report = state.poller.run_once().await?;
    Ok(Json(report))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

//! HTTP API
//!
//! - `POST /hook`: チャットWebhook
//! - `GET /poll`: 再チェックを1回実行
//! - `GET /health`: 稼働確認

pub mod error;
pub mod hook;
pub mod poll;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// ルーターを構築
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/hook", post(hook::receive_update))
        .route("/poll", get(poll::run_poll))
        .route("/health", get(poll::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

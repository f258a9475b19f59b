//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{http::StatusCode, response::IntoResponse, Json};
use mandown_common::error::MandownError;
use serde_json::json;
use tracing::error;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub MandownError);

impl From<MandownError> for AppError {
    fn from(err: MandownError) -> Self {
        AppError(err)
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            MandownError::Input(_) | MandownError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MandownError::Notify(_) => StatusCode::BAD_GATEWAY,
            MandownError::Storage(_) | MandownError::Config(_) | MandownError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        // ファイルパス等の詳細はログにのみ出す
        error!(status = status.as_u16(), error = %self.0, "Request failed");

        let payload = json!({
            "error": self.0.external_message()
        });

        (status, Json(payload)).into_response()
    }
}

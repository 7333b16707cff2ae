use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{BookingId, UserRole, ValidationError};
use crate::services::gate::Operation;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{operation} requires the {required} role")]
    Unauthorized {
        operation: Operation,
        required: UserRole,
    },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            // A rejected submission still answers with the sentinel id so
            // clients never mistake it for a created booking.
            AppError::Validation(_) => serde_json::json!({
                "error": self.to_string(),
                "id": BookingId::SENTINEL,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid line item: {reason}")]
    InvalidLineItem { reason: String },

    #[error("donation amount must be positive")]
    InvalidAmount,

    #[error("payment platform error: {0}")]
    Payment(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::EmptyCart => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "empty_cart",
                "at least one line item is required".to_string(),
            ),
            AppError::InvalidLineItem { reason } => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_line_item",
                reason.clone(),
            ),
            AppError::InvalidAmount => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "invalid_amount",
                "donation amount must be greater than zero".to_string(),
            ),
            // Upstream cause is logged but never surfaced to the caller.
            AppError::Payment(e) => {
                tracing::error!("Payment platform error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    "payment_session_failed",
                    "could not create a checkout session".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::LinkError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors returned by the HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid short ID")]
    InvalidId,
    #[error("Invalid short")]
    InvalidCode,
    #[error("Invalid request payload")]
    InvalidPayload,
    #[error(transparent)]
    Link(#[from] LinkError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidId | AppError::InvalidCode | AppError::InvalidPayload => {
                StatusCode::BAD_REQUEST
            }
            AppError::Link(LinkError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Link(LinkError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Link(LinkError::Storage(_) | LinkError::Encoding(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Link(LinkError::NotFound) => "Short not found".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: self.message(),
        });

        (status, body).into_response()
    }
}

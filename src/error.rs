use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// An authentication error (missing or invalid session).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An authorization error (valid session, insufficient role).
    #[error("Authorization failed")]
    Forbidden,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A multipart error.
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// An encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// The backend could not be reached at the network level.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend rejected request with status {status}: {message}")]
    BackendRejected {
        status: StatusCode,
        message: String,
    },

    /// The backend answered 2xx but the body did not have the expected shape.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::Forbidden => {
                tracing::warn!("Authorization failed");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Multipart(ref msg) => {
                tracing::error!("Multipart error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Encryption(ref msg) => {
                tracing::error!("Encryption error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Encryption error".to_string())
            }

            AppError::BackendUnavailable(ref msg) => {
                tracing::error!("Backend unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }

            AppError::BackendRejected { status, ref message } => {
                tracing::debug!("Backend rejected request: {} {}", status, message);
                (status, message.clone())
            }

            AppError::MalformedResponse(ref msg) => {
                tracing::error!("Malformed backend response: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Invalid response from backend".to_string(),
                )
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "message": message
        }))
        .unwrap_or_else(|_| r#"{"message":"Internal server error"}"#.to_string());

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

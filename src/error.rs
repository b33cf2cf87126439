use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or constraint-violating write. The underlying failure is
    /// surfaced to the caller in the `details` field.
    #[error("Bad request: {0}")]
    BadRequest(String, anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    /// Read failure. Callers only see the context message.
    #[error("Read error: {0}")]
    ReadError(String, anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(String, anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(
            "Invalid request body".to_string(),
            anyhow::anyhow!(rejection.body_text()),
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(
            "Invalid product id".to_string(),
            anyhow::anyhow!(rejection.body_text()),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let (status, error_message, details) = match self {
            AppError::BadRequest(msg, err) => {
                (StatusCode::BAD_REQUEST, msg, Some(err.to_string()))
            }
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None),
            // Read failures stay generic on the wire.
            AppError::ReadError(msg, _) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            AppError::DatabaseError(msg, err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                Some(err.to_string()),
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
            ),
            AppError::InternalError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(format!("{:#?}", err)),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                details,
            }),
        )
            .into_response()
    }
}

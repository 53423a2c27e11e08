//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::coerce::CoerceError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Requested collection is not on the allow-list.
    #[error("Invalid resource")]
    InvalidResource,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Access denied")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    /// A patch field failed type coercion; nothing was written.
    #[error("Invalid value for field '{field}': {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: CoerceError,
    },
    #[error("Not enough tokens")]
    InsufficientTokens,
    /// Allow-list is empty, so no admin resource can be served.
    #[error("No allowed collections configured")]
    Misconfigured,
    #[error("{0}")]
    Internal(String),
    #[error("Server error")]
    Store(#[from] mongodb::error::Error),
    #[error("Server error")]
    Serialize(#[from] bson::ser::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidResource | AppError::BadRequest(_) | AppError::InvalidValue { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InsufficientTokens => StatusCode::PAYMENT_REQUIRED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Misconfigured | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Serialize(e) => {
                tracing::error!(error = %e, "document serialization failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

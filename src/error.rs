use axum::extract::rejection::{BytesRejection, JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::envelope::ErrorEnvelope;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    InvalidRequest(String),
    /// Request body over the configured `max_body_size`.
    PayloadTooLarge(String),
    InvalidIdentifier(String),
    NotFound(String),
    /// Carries the reason recorded when the endpoint was soft-deleted.
    EndpointDeleted(String),
    Conflict(String),
    StoreUnavailable(String),
    ForwardFailed(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EndpointDeleted(_) => StatusCode::GONE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ForwardFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::StoreUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            AppError::PayloadTooLarge(msg) => write!(f, "payload too large: {msg}"),
            AppError::InvalidIdentifier(msg) => write!(f, "invalid identifier: {msg}"),
            AppError::NotFound(msg) => write!(f, "{msg}"),
            AppError::EndpointDeleted(reason) => {
                write!(f, "endpoint has been deleted, reason: {reason}")
            }
            AppError::Conflict(msg) => write!(f, "conflict: {msg}"),
            AppError::StoreUnavailable(msg) => write!(f, "store unavailable: {msg}"),
            AppError::ForwardFailed(msg) => write!(f, "forward failed: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {msg}");
                "store unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "internal server error".to_string()
            }
            AppError::ForwardFailed(msg) => {
                tracing::warn!("Forward failed: {msg}");
                self.to_string()
            }
            _ => self.to_string(),
        };

        ErrorEnvelope::new(status, message).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("endpoint not found".to_string()),
            StoreError::DuplicateKey(key) => {
                AppError::Conflict(format!("an endpoint with this {key} already exists"))
            }
            StoreError::Corrupt(msg) => AppError::Internal(format!("corrupt endpoint record: {msg}")),
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
        }
    }
}

impl AppError {
    fn from_body_rejection(status: StatusCode, text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(text)
        } else {
            AppError::InvalidRequest(text)
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::from_body_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::from_body_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

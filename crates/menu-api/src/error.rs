use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use menu_core::error::DomainError;
use menu_core::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        details: Option<FieldErrors>,
    },

    #[error("Unprocessable entity: {details}")]
    Unprocessable { details: FieldErrors },

    #[error("Conflict: {message}")]
    Conflict { message: String, details: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: "Invalid input".to_string(),
            details: Some(FieldErrors::single(field, message)),
        }
    }

    /// Like `From<DomainError>`, but field validation failures become 400.
    pub fn from_domain_as_bad_request(e: DomainError) -> Self {
        match e {
            DomainError::Validation(details) => ApiError::BadRequest {
                message: "Invalid input".to_string(),
                details: Some(details),
            },
            other => other.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::NotFound { .. } => ApiError::NotFound(message),
            DomainError::Validation(details) => ApiError::Unprocessable { details },
            DomainError::Conflict { details, .. } => ApiError::Conflict { message, details },
            DomainError::StorageError(_)
            | DomainError::MailError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => ApiError::InternalError(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized", msg, None)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg, None)
            }
            ApiError::BadRequest { message, details } => {
                tracing::warn!("Bad request: {} {:?}", message, details);
                (
                    StatusCode::BAD_REQUEST,
                    "BadRequest",
                    message,
                    details.and_then(|d| serde_json::to_value(d).ok()),
                )
            }
            ApiError::Unprocessable { details } => {
                tracing::warn!("Validation failed: {}", details);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "ValidationError",
                    "Validation failed".to_string(),
                    serde_json::to_value(details).ok(),
                )
            }
            ApiError::Conflict { message, details } => {
                tracing::warn!("Conflict: {} ({})", message, details);
                (StatusCode::CONFLICT, "Conflict", message, Some(Value::String(details)))
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

//! API error handling
//!
//! Every failure leaves the API as JSON:
//! `{ "errorIdentifier": "...", "message": "..." }`, plus the field errors
//! for validation failures.

use std::collections::BTreeMap;

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pm_auth::AuthError;
use pm_core::error::{PmError, ValidationErrors};
use pm_db::RepositoryError;
use pm_uploads::{UploadError, UploadServiceError};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    NotFound { resource: &'static str, id: String },
    Validation(ValidationErrors),
    Unauthorized(String),
    BadRequest(String),
    Conflict(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_identifier(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Conflict(_) => "conflict",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_identifier: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_identifier = self.error_identifier();

        let (message, errors) = match self {
            ApiError::NotFound { resource, id } if id.is_empty() => {
                (format!("{} not found", resource), None)
            }
            ApiError::NotFound { resource, id } => {
                (format!("{} with id {} not found", resource, id), None)
            }
            ApiError::Validation(errors) => {
                (errors.full_messages().join(", "), Some(errors.errors))
            }
            ApiError::Unauthorized(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Internal(msg) => (msg, None),
        };

        let body = ErrorBody {
            error_identifier,
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<PmError> for ApiError {
    fn from(err: PmError) -> Self {
        match err {
            PmError::NotFound { entity, value, .. } => ApiError::NotFound {
                resource: entity,
                id: value,
            },
            PmError::Unauthorized { message } | PmError::Forbidden { message } => {
                ApiError::Unauthorized(message)
            }
            PmError::Validation(errors) => ApiError::Validation(errors),
            PmError::Conflict { message } => ApiError::Conflict(message),
            other => {
                tracing::error!(error = %other, code = other.error_code(), "Request failed");
                ApiError::internal("Internal error")
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        PmError::from(err).into()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<UploadServiceError> for ApiError {
    fn from(err: UploadServiceError) -> Self {
        match err {
            UploadServiceError::Rejected(e @ UploadError::FileTooLarge { .. }) => {
                ApiError::PayloadTooLarge(e.to_string())
            }
            UploadServiceError::Rejected(e) => ApiError::BadRequest(e.to_string()),
            UploadServiceError::Storage(e) => PmError::Storage(e.to_string()).into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

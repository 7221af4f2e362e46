//! HTTP-facing wrapper around [`AppError`].
//!
//! The dashboards expect every failure as `{"error": "<message>"}` with a
//! status code they can branch on, so the wrapper owns the status mapping
//! and keeps raw infrastructure errors out of response bodies.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use gd_core::error::AppError;
use std::fmt;

#[derive(Debug)]
pub struct ApiError(pub AppError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// The user-facing message. Credential and validation variants carry a
    /// fixed string chosen at the call site; the thiserror prefix stays out
    /// of the body.
    fn message(&self) -> String {
        match &self.0 {
            AppError::NotFound(..) => self.0.to_string(),
            AppError::ValidationError(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::Upstream(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

/// Infrastructure failures get logged with detail and surfaced generically.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        log::error!("request failed: {err:#}");
        ApiError(AppError::Internal(
            "Something went wrong. Please try again.".to_string(),
        ))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.message() }))
    }
}

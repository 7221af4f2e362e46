//! # AppError
//!
//! Centralized error handling for the GradDrive ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all gd-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Poster, Ebook, Account)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., missing required field, empty upload)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Credential or passkey failure; message is one of the fixed
    /// user-facing strings, never a raw provider error
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the admin role
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists (e.g., duplicate account email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// A server-side fetch of an external URL failed (download proxy)
    #[error("upstream fetch failed: {0}")]
    Upstream(String),

    /// Infrastructure failure (e.g., store down, blob write failed)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for GradDrive logic.
pub type Result<T> = std::result::Result<T, AppError>;

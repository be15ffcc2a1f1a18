//! Service layer error types
//!
//! One error type for every service operation; domain errors pass through
//! and keep their category.

use folio_common::AppError;
use folio_core::{DomainError, ErrorCategory};
use thiserror::Error;

/// Service layer error type
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Application error (tokens, external services, ...)
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Session required but absent
    pub fn unauthenticated() -> Self {
        Self::Domain(DomainError::NotAuthenticated)
    }

    /// Coarse class of the failure
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::App(e) => match e.status_code() {
                400 => ErrorCategory::Validation,
                401 | 403 => ErrorCategory::Auth,
                404 => ErrorCategory::NotFound,
                409 => ErrorCategory::Conflict,
                _ => ErrorCategory::Internal,
            },
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Conflict(_) => ErrorCategory::Conflict,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(DomainError::NotAuthenticated) => 401,
            Self::App(e) => e.status_code(),
            _ => match self.category() {
                ErrorCategory::Validation => 400,
                ErrorCategory::Auth => 403,
                ErrorCategory::NotFound => 404,
                ErrorCategory::Conflict => 409,
                ErrorCategory::Internal => 500,
            },
        }
    }

    /// Error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => AppError::NotFound(format!("{resource} {id}")),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

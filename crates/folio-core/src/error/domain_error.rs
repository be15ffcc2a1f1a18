//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{CommentId, IdParseError};

/// Coarse error classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No session, or the session lacks the privilege
    Auth,
    /// The store rejected the write
    Conflict,
    /// The referenced record no longer exists
    NotFound,
    /// The request itself is malformed
    Validation,
    /// Infrastructure failure
    Internal,
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Admin not listed: {0}")]
    AdminNotListed(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdParseError),

    #[error("Comment text must not be empty")]
    EmptyComment,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Replies cannot have replies")]
    NestedReply,

    #[error("Only top-level comments can be pinned")]
    CannotPinReply,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Not comment author")]
    NotCommentAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Write rejected: {0}")]
    WriteRejected(String),

    // =========================================================================
    // Infrastructure Errors
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::AdminNotListed(_) => "UNKNOWN_ADMIN",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidId(_) => "INVALID_ID",
            Self::EmptyComment => "EMPTY_COMMENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::NestedReply => "NESTED_REPLY",
            Self::CannotPinReply => "CANNOT_PIN_REPLY",

            // Authorization
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::MissingCapability(_) => "MISSING_CAPABILITY",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",

            // Conflict
            Self::WriteRejected(_) => "WRITE_REJECTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CommentNotFound(_) | Self::AdminNotListed(_) => ErrorCategory::NotFound,
            Self::ValidationError(_)
            | Self::InvalidEmail
            | Self::InvalidId(_)
            | Self::EmptyComment
            | Self::ContentTooLong { .. }
            | Self::NestedReply
            | Self::CannotPinReply => ErrorCategory::Validation,
            Self::NotAuthenticated | Self::MissingCapability(_) | Self::NotCommentAuthor => {
                ErrorCategory::Auth
            }
            Self::WriteRejected(_) => ErrorCategory::Conflict,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::InternalError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Check if this is an authentication or authorization error
    pub fn is_authorization(&self) -> bool {
        self.category() == ErrorCategory::Auth
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        self.category() == ErrorCategory::Conflict
    }
}

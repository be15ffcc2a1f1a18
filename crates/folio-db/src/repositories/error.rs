//! Error handling utilities for repositories

use folio_core::{CommentId, DomainError};
use sqlx::Error as SqlxError;

/// Postgres SQLSTATE codes for writes the store refused
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const CHECK_VIOLATION: &str = "23514";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if let Some(code) = db_err.code() {
            if matches!(
                code.as_ref(),
                SERIALIZATION_FAILURE | DEADLOCK_DETECTED | CHECK_VIOLATION
            ) {
                return DomainError::WriteRejected(db_err.message().to_string());
            }
        }
    }
    DomainError::DatabaseError(e.to_string())
}

pub fn comment_not_found(id: CommentId) -> DomainError {
    DomainError::CommentNotFound(id)
}

//! Entity to model mappers
//!
//! Rows are converted with `TryFrom` since stored identifiers are re-validated
//! on the way out; a row that no longer parses surfaces as a database error.

mod comment;
mod reaction;

pub use comment::CommentInsert;
pub(crate) use reaction::parse_kind;

//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in folio-core.

mod admin;
mod comment;
mod error;
mod reaction;

pub use admin::PgAdminRepository;
pub use comment::PgCommentRepository;
pub use error::map_db_error;
pub use reaction::PgReactionRepository;

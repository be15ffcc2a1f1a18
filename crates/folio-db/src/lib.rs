//! # folio-db
//!
//! Persistence layer implementing the folio-core repository traits.
//!
//! ## Overview
//!
//! - PostgreSQL repositories via SQLx, with the schema in `migrations/`
//! - Database models with SQLx `FromRow` derives and entity mappers
//! - [`MemoryStore`], an in-process implementation of the same traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use folio_db::PgCommentRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let comments = PgCommentRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgAdminRepository, PgCommentRepository, PgReactionRepository};

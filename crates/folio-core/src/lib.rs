//! # folio-core
//!
//! Domain layer for the folio content backend: comments and their threads,
//! per-user reactions with aggregate tallies, admin authorization, domain
//! events and the repository ports implemented by the storage crates.
//! This crate has no dependency on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod thread;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    initials, AdminAllowList, Comment, Identity, NewComment, ReactionChoice, ReactionKind,
    ReactionOutcome, ReactionTally, ReactionTransition, TallyDelta,
};
pub use error::{DomainError, ErrorCategory};
pub use events::{DomainEvent, WatchTopic};
pub use thread::{
    assemble_tree, CommentThread, VisibleWindow, WindowedThreads, DEFAULT_VISIBLE_THREADS,
};
pub use traits::{AdminRepository, CommentRepository, ReactionRepository, RepoResult};
pub use value_objects::{
    AuthorizationPolicy, Capabilities, CommentId, EmailAddress, IdParseError, TargetId, UserId,
};

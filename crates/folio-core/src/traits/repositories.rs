//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the storage crates provide
//! the implementation (Postgres in production, an in-memory store for tests).

use async_trait::async_trait;

use crate::entities::{
    AdminAllowList, Comment, NewComment, ReactionChoice, ReactionKind, ReactionOutcome,
    ReactionTally,
};
use crate::error::DomainError;
use crate::value_objects::{CommentId, EmailAddress, TargetId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>>;

    /// All comments of a target, parents and replies, in no particular order
    async fn find_by_target(&self, target_id: &TargetId) -> RepoResult<Vec<Comment>>;

    /// Newest comments across all targets
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Comment>>;

    /// Total number of stored comments
    async fn count(&self) -> RepoResult<i64>;

    /// Insert a comment; the store assigns `created_at`
    async fn create(&self, comment: &NewComment) -> RepoResult<Comment>;

    /// Set the pinned flag, returning the updated comment
    async fn set_pinned(&self, id: CommentId, pinned: bool) -> RepoResult<Comment>;

    /// Delete a comment. Fails with `CommentNotFound` if it is already gone.
    async fn delete(&self, id: CommentId) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Current tally, zeroed if nobody reacted yet
    async fn tally(&self, target_id: &TargetId) -> RepoResult<ReactionTally>;

    /// The user's choice record, including tombstones
    async fn choice(
        &self,
        target_id: &TargetId,
        user_id: &UserId,
    ) -> RepoResult<Option<ReactionChoice>>;

    /// Atomically read the user's choice, resolve the transition for
    /// `requested`, and write both the new choice and the tally delta.
    /// Either both writes happen or neither does.
    async fn apply(
        &self,
        target_id: &TargetId,
        user_id: &UserId,
        requested: ReactionKind,
    ) -> RepoResult<ReactionOutcome>;
}

// ============================================================================
// Admin Repository
// ============================================================================

#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Current allow-list snapshot
    async fn load(&self) -> RepoResult<AdminAllowList>;

    /// Add an address; returns false if it was already listed
    async fn add(&self, email: &EmailAddress) -> RepoResult<bool>;

    /// Remove an address; returns false if it was not listed
    async fn remove(&self, email: &EmailAddress) -> RepoResult<bool>;
}

//! Domain events - emitted after a write succeeds
//!
//! These events are used for:
//! - Re-delivering full snapshots to live watchers of a target
//! - Fanning out writes between API instances over pub/sub

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ReactionKind;
use crate::value_objects::{CommentId, TargetId, UserId};

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    CommentCreated(CommentCreatedEvent),
    CommentDeleted(CommentDeletedEvent),
    CommentPinned(CommentPinnedEvent),
    ReactionChanged(ReactionChangedEvent),
    AdminListChanged(AdminListChangedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommentCreated(_) => "COMMENT_CREATED",
            Self::CommentDeleted(_) => "COMMENT_DELETED",
            Self::CommentPinned(_) => "COMMENT_PINNED",
            Self::ReactionChanged(_) => "REACTION_CHANGED",
            Self::AdminListChanged(_) => "ADMIN_LIST_CHANGED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::CommentCreated(e) => e.timestamp,
            Self::CommentDeleted(e) => e.timestamp,
            Self::CommentPinned(e) => e.timestamp,
            Self::ReactionChanged(e) => e.timestamp,
            Self::AdminListChanged(e) => e.timestamp,
        }
    }

    /// Target the event belongs to; `None` for global events
    pub fn target_id(&self) -> Option<&TargetId> {
        match self {
            Self::CommentCreated(e) => Some(&e.target_id),
            Self::CommentDeleted(e) => Some(&e.target_id),
            Self::CommentPinned(e) => Some(&e.target_id),
            Self::ReactionChanged(e) => Some(&e.target_id),
            Self::AdminListChanged(_) => None,
        }
    }

    /// Whether a watcher of `topic` has to reload its snapshot
    pub fn affects(&self, topic: &WatchTopic) -> bool {
        match (self, topic) {
            (
                Self::CommentCreated(_) | Self::CommentDeleted(_) | Self::CommentPinned(_),
                WatchTopic::Comments { target_id },
            )
            | (Self::ReactionChanged(_), WatchTopic::Reactions { target_id }) => {
                self.target_id() == Some(target_id)
            }
            // Admin rights feed the per-viewer flags of every comment list
            (Self::AdminListChanged(_), WatchTopic::Comments { .. }) => true,
            _ => false,
        }
    }
}

/// What a live view is watching
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WatchTopic {
    Comments { target_id: TargetId },
    Reactions { target_id: TargetId },
}

impl WatchTopic {
    pub fn target_id(&self) -> &TargetId {
        match self {
            Self::Comments { target_id } | Self::Reactions { target_id } => target_id,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreatedEvent {
    pub comment_id: CommentId,
    pub target_id: TargetId,
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDeletedEvent {
    pub comment_id: CommentId,
    pub target_id: TargetId,
    pub deleted_by: UserId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPinnedEvent {
    pub comment_id: CommentId,
    pub target_id: TargetId,
    pub pinned: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionChangedEvent {
    pub target_id: TargetId,
    pub user_id: UserId,
    pub kind: Option<ReactionKind>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminListChangedEvent {
    pub timestamp: DateTime<Utc>,
}

//! Request DTOs for API endpoints
//!
//! Request bodies implement `Deserialize` and `Validate`; query strings are
//! plain `Deserialize` structs with defaults.

use folio_core::{CommentId, TargetId, WatchTopic};
use serde::Deserialize;
use validator::Validate;

pub use folio_markup::ArticleBody as RenderRequest;

// ============================================================================
// Comment Requests
// ============================================================================

/// New comment or reply. The length cap is enforced by the domain with the
/// configured maximum.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment text must not be empty"))]
    pub text: String,

    /// Reply to this top-level comment
    #[serde(default)]
    pub parent_id: Option<CommentId>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListCommentsQuery {
    /// Show every thread instead of the first few
    #[serde(default)]
    pub expanded: bool,
}

/// Deletion is destructive and must be confirmed explicitly
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DeleteCommentQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct ModerationQuery {
    #[validate(range(min = 1, max = 500, message = "limit must be between 1 and 500"))]
    pub limit: Option<i64>,
}

// ============================================================================
// Watch Protocol
// ============================================================================

/// Client frames on the watch websocket
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WatchCommand {
    /// Start (or restart) watching `topic` of `target` in `container`
    Watch {
        container: String,
        topic: TopicKind,
        target: TargetId,
    },
    Unwatch {
        container: String,
    },
    Expand {
        container: String,
        expanded: bool,
    },
    /// Switch the viewer identity; `null` signs out
    Identify {
        token: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    Comments,
    Reactions,
}

impl TopicKind {
    pub fn topic(self, target_id: TargetId) -> WatchTopic {
        match self {
            Self::Comments => WatchTopic::Comments { target_id },
            Self::Reactions => WatchTopic::Reactions { target_id },
        }
    }
}

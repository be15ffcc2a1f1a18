//! Response DTOs for API endpoints and watch snapshots
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use folio_core::{Capabilities, CommentId, EmailAddress, ReactionKind, TargetId, UserId};
use folio_markup::InviteCard;
use serde::Serialize;

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorResponse {
    pub id: UserId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Avatar fallback when there is no photo
    pub initials: String,
}

/// A comment as seen by one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentResponse {
    pub id: CommentId,
    pub target_id: TargetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    pub author: AuthorResponse,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub age_label: String,
    pub pinned: bool,
    pub can_delete: bool,
    pub can_pin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadResponse {
    pub comment: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerFlags {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<UserId>,
    pub is_admin: bool,
}

/// Full comment list of a target for one viewer and window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentsSnapshot {
    pub target_id: TargetId,
    pub threads: Vec<ThreadResponse>,
    /// Threads behind "show all"
    pub hidden: usize,
    pub expanded: bool,
    /// Visible comments in the whole tree, replies included
    pub total: usize,
    pub viewer: ViewerFlags,
}

/// Admin view across all targets, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationFeed {
    pub total: i64,
    pub comments: Vec<CommentResponse>,
}

// ============================================================================
// Reaction Responses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TallyResponse {
    pub like: u64,
    pub dislike: u64,
    pub heart: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionState {
    pub target_id: TargetId,
    pub counts: TallyResponse,
    /// `None` for anonymous viewers and for users who have not reacted
    pub viewer_choice: Option<ReactionKind>,
}

/// Result of a reaction click. `applied == false` means the request was
/// absorbed by the re-entrancy guard and nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionApplied {
    pub applied: bool,
    pub state: ReactionState,
}

// ============================================================================
// User / Admin Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponse {
    pub uid: UserId,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub email_verified: bool,
    pub initials: String,
    pub is_admin: bool,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminListResponse {
    pub admins: Vec<EmailAddress>,
    /// Domain whose verified e-mails are admins without being listed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminChangeResponse {
    pub email: EmailAddress,
    /// False when the request did not change the list
    pub changed: bool,
}

// ============================================================================
// Content Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedContent {
    pub html: String,
    /// Cards the page may enrich via the invites endpoint
    pub invites: Vec<InviteCard>,
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
    pub redis: String,
}

impl ReadinessResponse {
    /// `redis_healthy == None` when Redis is not configured
    pub fn ready(store_healthy: bool, redis_healthy: Option<bool>) -> Self {
        let all_healthy = store_healthy && redis_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: match redis_healthy {
                    Some(true) => "healthy",
                    Some(false) => "unhealthy",
                    None => "disabled",
                }
                .to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

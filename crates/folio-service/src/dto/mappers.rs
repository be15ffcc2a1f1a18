//! Entity to DTO mappers
//!
//! Conversions from domain entities to response DTOs, plus the relative
//! time label shown next to each comment.

use chrono::{DateTime, Utc};
use folio_core::{
    AuthorizationPolicy, Capabilities, Comment, CommentThread, Identity, ReactionChoice,
    ReactionTally,
};

use super::responses::{
    AuthorResponse, CommentResponse, CurrentUserResponse, ReactionState, TallyResponse,
    ThreadResponse, ViewerFlags,
};

/// Relative age: "just now", "N min ago", "Nh ago", "Nd ago", then the date.
/// Timestamps in the future count as "just now".
pub fn age_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created_at).num_seconds();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{} min ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 7 * 86_400 => format!("{}d ago", s / 86_400),
        _ => created_at.format("%Y-%m-%d").to_string(),
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<&Comment> for AuthorResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.author_id.clone(),
            display_name: comment.author_display_name.clone(),
            photo_url: comment.author_photo_url.clone(),
            initials: comment.author_initials(),
        }
    }
}

impl CommentResponse {
    /// Render a comment for `viewer`, with the actions the policy allows
    pub fn for_viewer(
        comment: &Comment,
        policy: &AuthorizationPolicy,
        viewer: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> Self {
        let (can_delete, can_pin) = match viewer {
            Some(identity) => (
                policy.can_delete(identity, comment),
                policy.can_pin(identity, comment),
            ),
            None => (false, false),
        };
        Self {
            id: comment.id,
            target_id: comment.target_id.clone(),
            parent_id: comment.parent_id,
            author: AuthorResponse::from(comment),
            text: comment.text.clone(),
            created_at: comment.created_at,
            age_label: age_label(comment.created_at, now),
            pinned: comment.pinned,
            can_delete,
            can_pin,
        }
    }
}

impl ThreadResponse {
    pub fn for_viewer(
        thread: &CommentThread,
        policy: &AuthorizationPolicy,
        viewer: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            comment: CommentResponse::for_viewer(&thread.parent, policy, viewer, now),
            replies: thread
                .replies
                .iter()
                .map(|reply| CommentResponse::for_viewer(reply, policy, viewer, now))
                .collect(),
        }
    }
}

impl ViewerFlags {
    pub fn new(policy: &AuthorizationPolicy, viewer: Option<&Identity>) -> Self {
        Self {
            authenticated: viewer.is_some(),
            uid: viewer.map(|identity| identity.uid.clone()),
            is_admin: viewer.is_some_and(|identity| policy.is_admin(identity)),
        }
    }
}

// ============================================================================
// Reaction Mappers
// ============================================================================

impl From<&ReactionTally> for TallyResponse {
    fn from(tally: &ReactionTally) -> Self {
        Self {
            like: tally.like,
            dislike: tally.dislike,
            heart: tally.heart,
            total: tally.total(),
        }
    }
}

impl ReactionState {
    pub fn new(tally: &ReactionTally, choice: Option<&ReactionChoice>) -> Self {
        Self {
            target_id: tally.target_id.clone(),
            counts: TallyResponse::from(tally),
            viewer_choice: choice.and_then(|c| c.kind),
        }
    }
}

// ============================================================================
// User Mappers
// ============================================================================

impl CurrentUserResponse {
    pub fn new(identity: &Identity, capabilities: Capabilities) -> Self {
        Self {
            uid: identity.uid.clone(),
            display_name: identity.resolved_display_name(),
            photo_url: identity.photo_url.clone(),
            email: identity.email.clone(),
            email_verified: identity.email_verified,
            initials: identity.initials(),
            is_admin: capabilities.contains(Capabilities::ADMIN),
            capabilities,
        }
    }
}

//! Comment entity - a top-level comment or a one-level reply on a target

use chrono::{DateTime, Utc};

use super::identity::{initials, Identity};
use crate::error::DomainError;
use crate::value_objects::{CommentId, TargetId, UserId};

/// Stored comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub target_id: TargetId,
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub author_email: Option<String>,
    pub text: String,
    /// Assigned by the store on insert
    pub created_at: DateTime<Utc>,
    pub pinned: bool,
}

impl Comment {
    /// Check if comment is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn author_initials(&self) -> String {
        initials(&self.author_display_name)
    }
}

/// A validated comment waiting to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub id: CommentId,
    pub target_id: TargetId,
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub author_email: Option<String>,
    pub text: String,
}

impl NewComment {
    /// Create a top-level comment on a target
    pub fn top_level(
        target_id: TargetId,
        author: &Identity,
        text: &str,
        max_len: usize,
    ) -> Result<Self, DomainError> {
        Ok(Self::build(target_id, None, author, validate_text(text, max_len)?))
    }

    /// Create a reply. Replies are flat: the parent must itself be top-level.
    pub fn reply(
        parent: &Comment,
        author: &Identity,
        text: &str,
        max_len: usize,
    ) -> Result<Self, DomainError> {
        if parent.is_reply() {
            return Err(DomainError::NestedReply);
        }
        Ok(Self::build(
            parent.target_id.clone(),
            Some(parent.id),
            author,
            validate_text(text, max_len)?,
        ))
    }

    fn build(
        target_id: TargetId,
        parent_id: Option<CommentId>,
        author: &Identity,
        text: String,
    ) -> Self {
        Self {
            id: CommentId::generate(),
            target_id,
            parent_id,
            author_id: author.uid.clone(),
            author_display_name: author.resolved_display_name(),
            author_photo_url: author.photo_url.clone(),
            author_email: author.email.clone(),
            text,
        }
    }

    /// Materialize with the store-assigned timestamp
    pub fn into_comment(self, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id: self.id,
            target_id: self.target_id,
            parent_id: self.parent_id,
            author_id: self.author_id,
            author_display_name: self.author_display_name,
            author_photo_url: self.author_photo_url,
            author_email: self.author_email,
            text: self.text,
            created_at,
            pinned: false,
        }
    }
}

fn validate_text(text: &str, max_len: usize) -> Result<String, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::EmptyComment);
    }
    if text.chars().count() > max_len {
        return Err(DomainError::ContentTooLong { max: max_len });
    }
    Ok(text.to_string())
}

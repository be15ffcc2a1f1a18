//! Comment entity <-> model mapper

use folio_core::{Comment, CommentId, DomainError, NewComment, TargetId, UserId};
use uuid::Uuid;

use crate::models::CommentModel;

impl TryFrom<CommentModel> for Comment {
    type Error = DomainError;

    fn try_from(model: CommentModel) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: CommentId::from_uuid(model.id),
            target_id: TargetId::parse(model.target_id).map_err(corrupt_row)?,
            parent_id: model.parent_id.map(CommentId::from_uuid),
            author_id: UserId::parse(model.author_id).map_err(corrupt_row)?,
            author_display_name: model.author_display_name,
            author_photo_url: model.author_photo_url,
            author_email: model.author_email,
            text: model.text,
            created_at: model.created_at,
            pinned: model.pinned,
        })
    }
}

pub(crate) fn corrupt_row(e: impl std::fmt::Display) -> DomainError {
    DomainError::DatabaseError(format!("corrupt row: {e}"))
}

/// Values bound by the insert statement
pub struct CommentInsert<'a> {
    pub id: Uuid,
    pub target_id: &'a str,
    pub parent_id: Option<Uuid>,
    pub author_id: &'a str,
    pub author_display_name: &'a str,
    pub author_photo_url: Option<&'a str>,
    pub author_email: Option<&'a str>,
    pub text: &'a str,
}

impl<'a> CommentInsert<'a> {
    pub fn new(comment: &'a NewComment) -> Self {
        Self {
            id: comment.id.into_inner(),
            target_id: comment.target_id.as_str(),
            parent_id: comment.parent_id.map(CommentId::into_inner),
            author_id: comment.author_id.as_str(),
            author_display_name: &comment.author_display_name,
            author_photo_url: comment.author_photo_url.as_deref(),
            author_email: comment.author_email.as_deref(),
            text: &comment.text,
        }
    }
}

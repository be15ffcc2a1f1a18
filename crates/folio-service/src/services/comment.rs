//! Comment service
//!
//! Comment snapshots per target, creation of comments and replies, deletion,
//! pinning and the admin moderation feed. Every successful write publishes a
//! domain event on the change feed.

use chrono::Utc;
use folio_core::events::{CommentCreatedEvent, CommentDeletedEvent, CommentPinnedEvent};
use folio_core::{
    assemble_tree, AuthorizationPolicy, Capabilities, Comment, CommentId, DomainError,
    DomainEvent, Identity, NewComment, TargetId, VisibleWindow,
};
use tracing::{info, instrument};

use crate::dto::{
    CommentResponse, CommentsSnapshot, CreateCommentRequest, ModerationFeed, ThreadResponse,
    ViewerFlags,
};

use super::authorization::AuthorizationService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const DEFAULT_MODERATION_LIMIT: i64 = 50;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Window with the configured thread limit
    pub fn window(&self, expanded: bool) -> VisibleWindow {
        VisibleWindow::new(self.ctx.settings().visible_threads, expanded)
    }

    /// Full comment list of a target as seen by `viewer`.
    ///
    /// The tree is reassembled from the raw comments on every call, orphaned
    /// replies are left out.
    #[instrument(skip(self, viewer))]
    pub async fn snapshot(
        &self,
        target_id: &TargetId,
        viewer: Option<&Identity>,
        window: VisibleWindow,
    ) -> ServiceResult<CommentsSnapshot> {
        let policy = self.policy().await?;
        let raw = self.ctx.comment_repo().find_by_target(target_id).await?;

        let threads = assemble_tree(raw);
        let total = threads.iter().map(|t| 1 + t.replies.len()).sum();
        let windowed = window.apply(threads);
        let now = Utc::now();

        Ok(CommentsSnapshot {
            target_id: target_id.clone(),
            threads: windowed
                .visible
                .iter()
                .map(|thread| ThreadResponse::for_viewer(thread, &policy, viewer, now))
                .collect(),
            hidden: windowed.hidden,
            expanded: window.expanded,
            total,
            viewer: ViewerFlags::new(&policy, viewer),
        })
    }

    /// Create a comment, or a reply when `parent_id` is set
    #[instrument(skip(self, author, request), fields(uid = %author.uid))]
    pub async fn create_comment(
        &self,
        target_id: &TargetId,
        author: &Identity,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        if let Some(parent_id) = request.parent_id {
            return self
                .create_reply(target_id, parent_id, author, &request.text)
                .await;
        }

        let new_comment = NewComment::top_level(
            target_id.clone(),
            author,
            &request.text,
            self.ctx.settings().max_comment_length,
        )?;
        self.insert(new_comment, author).await
    }

    /// Reply to a top-level comment of the same target
    #[instrument(skip(self, author, text), fields(uid = %author.uid))]
    pub async fn create_reply(
        &self,
        target_id: &TargetId,
        parent_id: CommentId,
        author: &Identity,
        text: &str,
    ) -> ServiceResult<CommentResponse> {
        let parent = self.find(parent_id).await?;
        if &parent.target_id != target_id {
            return Err(ServiceError::validation(
                "Parent comment belongs to another target",
            ));
        }

        let new_comment =
            NewComment::reply(&parent, author, text, self.ctx.settings().max_comment_length)?;
        self.insert(new_comment, author).await
    }

    /// Delete a comment. Replies of a deleted parent stay stored but drop out
    /// of snapshots.
    ///
    /// # Errors
    /// Validation when not confirmed, `CommentNotFound` when already gone,
    /// `NotCommentAuthor` when neither the author nor an admin
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn delete_comment(
        &self,
        comment_id: CommentId,
        identity: &Identity,
        confirmed: bool,
    ) -> ServiceResult<()> {
        if !confirmed {
            return Err(ServiceError::validation("Deletion must be confirmed"));
        }

        let comment = self.find(comment_id).await?;
        let policy = self.policy().await?;
        if !policy.can_delete(identity, &comment) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        self.ctx.comment_repo().delete(comment_id).await?;
        info!(comment_id = %comment_id, target_id = %comment.target_id, "Comment deleted");

        self.ctx
            .feed()
            .publish(DomainEvent::CommentDeleted(CommentDeletedEvent {
                comment_id,
                target_id: comment.target_id,
                deleted_by: identity.uid.clone(),
                timestamp: Utc::now(),
            }))
            .await;
        Ok(())
    }

    /// Pin or unpin a top-level comment
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn set_pinned(
        &self,
        comment_id: CommentId,
        identity: &Identity,
        pinned: bool,
    ) -> ServiceResult<CommentResponse> {
        let policy = self.policy().await?;
        if !policy
            .capabilities(Some(identity))
            .contains(Capabilities::PIN_COMMENTS)
        {
            return Err(DomainError::MissingCapability("PIN_COMMENTS".to_string()).into());
        }

        let comment = self.find(comment_id).await?;
        if comment.is_reply() {
            return Err(DomainError::CannotPinReply.into());
        }

        let updated = self.ctx.comment_repo().set_pinned(comment_id, pinned).await?;
        info!(comment_id = %comment_id, pinned, "Comment pin changed");

        self.ctx
            .feed()
            .publish(DomainEvent::CommentPinned(CommentPinnedEvent {
                comment_id,
                target_id: updated.target_id.clone(),
                pinned,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(CommentResponse::for_viewer(
            &updated,
            &policy,
            Some(identity),
            Utc::now(),
        ))
    }

    /// Newest comments across all targets, for admins
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn moderation_feed(
        &self,
        identity: &Identity,
        limit: Option<i64>,
    ) -> ServiceResult<ModerationFeed> {
        let policy = self.policy().await?;
        if !policy
            .capabilities(Some(identity))
            .contains(Capabilities::DELETE_ANY_COMMENT)
        {
            return Err(DomainError::MissingCapability("DELETE_ANY_COMMENT".to_string()).into());
        }

        let limit = limit.unwrap_or(DEFAULT_MODERATION_LIMIT);
        let total = self.ctx.comment_repo().count().await?;
        let recent = self.ctx.comment_repo().find_recent(limit).await?;
        let now = Utc::now();

        Ok(ModerationFeed {
            total,
            comments: recent
                .iter()
                .map(|comment| CommentResponse::for_viewer(comment, &policy, Some(identity), now))
                .collect(),
        })
    }

    // === Helpers ===

    async fn policy(&self) -> ServiceResult<AuthorizationPolicy> {
        AuthorizationService::new(self.ctx).policy().await
    }

    async fn find(&self, comment_id: CommentId) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::CommentNotFound(comment_id).into())
    }

    async fn insert(
        &self,
        new_comment: NewComment,
        author: &Identity,
    ) -> ServiceResult<CommentResponse> {
        // Loaded first so a failed read never follows a committed write
        let policy = self.policy().await?;
        let comment = self.ctx.comment_repo().create(&new_comment).await?;
        info!(
            comment_id = %comment.id,
            target_id = %comment.target_id,
            reply = comment.is_reply(),
            "Comment created"
        );

        self.ctx
            .feed()
            .publish(DomainEvent::CommentCreated(CommentCreatedEvent {
                comment_id: comment.id,
                target_id: comment.target_id.clone(),
                parent_id: comment.parent_id,
                author_id: comment.author_id.clone(),
                timestamp: comment.created_at,
            }))
            .await;

        Ok(CommentResponse::for_viewer(
            &comment,
            &policy,
            Some(author),
            Utc::now(),
        ))
    }
}

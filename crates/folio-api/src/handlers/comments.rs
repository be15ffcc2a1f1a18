//! Comment handlers
//!
//! Thread listing, posting, deletion, pinning and the moderation feed.

use axum::{extract::State, Json};
use folio_service::dto::{
    CommentResponse, CommentsSnapshot, CreateCommentRequest, DeleteCommentQuery,
    ListCommentsQuery, ModerationFeed, ModerationQuery,
};
use folio_service::CommentService;

use crate::extractors::{
    AuthUser, CommentIdPath, MaybeAuthUser, ParsedPath, ParsedQuery, TargetPath, ValidatedJson,
    ValidatedQuery,
};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Comments snapshot for a target
///
/// GET /targets/{target_id}/comments?expanded=
pub async fn list_comments(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    ParsedPath(path): ParsedPath<TargetPath>,
    ParsedQuery(query): ParsedQuery<ListCommentsQuery>,
) -> ApiResult<Json<CommentsSnapshot>> {
    let service = CommentService::new(state.service_context());
    let snapshot = service
        .snapshot(&path.target_id, viewer.as_ref(), service.window(query.expanded))
        .await?;
    Ok(Json(snapshot))
}

/// Post a comment or a reply
///
/// POST /targets/{target_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ParsedPath(path): ParsedPath<TargetPath>,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let comment = service
        .create_comment(&path.target_id, &identity, request)
        .await?;
    Ok(Created(comment))
}

/// Delete a comment; requires `?confirm=true`
///
/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ParsedPath(path): ParsedPath<CommentIdPath>,
    ParsedQuery(query): ParsedQuery<DeleteCommentQuery>,
) -> ApiResult<NoContent> {
    let service = CommentService::new(state.service_context());
    service
        .delete_comment(path.comment_id, &identity, query.confirm)
        .await?;
    Ok(NoContent)
}

/// Pin a top-level comment
///
/// PUT /comments/{comment_id}/pin
pub async fn pin_comment(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ParsedPath(path): ParsedPath<CommentIdPath>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let comment = service.set_pinned(path.comment_id, &identity, true).await?;
    Ok(Json(comment))
}

/// Unpin a comment
///
/// DELETE /comments/{comment_id}/pin
pub async fn unpin_comment(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ParsedPath(path): ParsedPath<CommentIdPath>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let comment = service.set_pinned(path.comment_id, &identity, false).await?;
    Ok(Json(comment))
}

/// Newest comments across all targets (admin only)
///
/// GET /moderation/comments?limit=
pub async fn moderation_feed(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedQuery(query): ValidatedQuery<ModerationQuery>,
) -> ApiResult<Json<ModerationFeed>> {
    let service = CommentService::new(state.service_context());
    let feed = service.moderation_feed(&identity, query.limit).await?;
    Ok(Json(feed))
}

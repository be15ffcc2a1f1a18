//! Reaction handlers

use axum::{extract::State, Json};
use folio_service::dto::{ReactionApplied, ReactionState};
use folio_service::ReactionService;

use crate::extractors::{MaybeAuthUser, ParsedPath, ReactionPath, TargetPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Tally and the viewer's own choice
///
/// GET /targets/{target_id}/reactions
pub async fn get_reactions(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    ParsedPath(path): ParsedPath<TargetPath>,
) -> ApiResult<Json<ReactionState>> {
    let service = ReactionService::new(state.service_context());
    let reactions = service.state(&path.target_id, viewer.as_ref()).await?;
    Ok(Json(reactions))
}

/// Toggle or switch the viewer's reaction. Anonymous callers get
/// `NOT_AUTHENTICATED`.
///
/// PUT /targets/{target_id}/reactions/{kind}
pub async fn apply_reaction(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    ParsedPath(path): ParsedPath<ReactionPath>,
) -> ApiResult<Json<ReactionApplied>> {
    let kind = path.kind()?;
    let service = ReactionService::new(state.service_context());
    let applied = service
        .apply_reaction(&path.target_id, viewer.as_ref(), kind)
        .await?;
    Ok(Json(applied))
}

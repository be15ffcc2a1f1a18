//! Content handlers
//!
//! Article rendering and invite card resolution.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use folio_service::dto::{RenderRequest, RenderedContent};
use folio_service::{ContentService, InviteDetails};

use crate::extractors::{json_rejection, ParsedPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Render an article body to HTML
///
/// POST /render
pub async fn render(
    State(state): State<AppState>,
    body: Result<Json<RenderRequest>, JsonRejection>,
) -> ApiResult<Json<RenderedContent>> {
    let Json(body) = body.map_err(json_rejection)?;

    let service = ContentService::new(state.service_context());
    Ok(Json(service.render(&body)))
}

/// Resolve an invite code to server details
///
/// GET /invites/{code}
pub async fn get_invite(
    State(state): State<AppState>,
    ParsedPath(code): ParsedPath<String>,
) -> ApiResult<Json<InviteDetails>> {
    let service = ContentService::new(state.service_context());
    let details = service.invite(&code).await?;
    Ok(Json(details))
}

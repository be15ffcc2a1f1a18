//! Admin allow-list handlers
//!
//! All endpoints require the `MANAGE_ADMINS` capability.

use axum::{extract::State, Json};
use folio_service::dto::{AdminChangeResponse, AdminListResponse};
use folio_service::AuthorizationService;

use crate::extractors::{AuthUser, ParsedPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /admins
pub async fn list_admins(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<AdminListResponse>> {
    let service = AuthorizationService::new(state.service_context());
    Ok(Json(service.list_admins(&identity).await?))
}

/// PUT /admins/{email}
pub async fn add_admin(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ParsedPath(email): ParsedPath<String>,
) -> ApiResult<Json<AdminChangeResponse>> {
    let service = AuthorizationService::new(state.service_context());
    Ok(Json(service.add_admin(&identity, &email).await?))
}

/// DELETE /admins/{email}
pub async fn remove_admin(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ParsedPath(email): ParsedPath<String>,
) -> ApiResult<Json<AdminChangeResponse>> {
    let service = AuthorizationService::new(state.service_context());
    Ok(Json(service.remove_admin(&identity, &email).await?))
}

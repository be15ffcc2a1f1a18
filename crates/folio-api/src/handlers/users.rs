//! User handlers

use axum::{extract::State, Json};
use folio_service::dto::CurrentUserResponse;
use folio_service::AuthorizationService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Current viewer with admin status and capabilities
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = AuthorizationService::new(state.service_context());
    let response = service.current_user(&identity).await?;
    Ok(Json(response))
}

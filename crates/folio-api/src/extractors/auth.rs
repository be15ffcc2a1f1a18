//! Identity extractors
//!
//! Verify the bearer identity token from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use folio_common::AppError;
use folio_core::Identity;

use crate::response::ApiError;
use crate::state::AppState;

fn verify(state: &AppState, token: &str) -> Result<Identity, ApiError> {
    state.identity().verify(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected identity token");
        ApiError::App(AppError::from(e))
    })
}

/// Signed-in viewer; rejects the request without a valid token
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        verify(&app_state, bearer.token()).map(AuthUser)
    }
}

/// Optional viewer
///
/// `None` when no Authorization header is present. A header carrying an
/// invalid or expired token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let app_state = AppState::from_ref(state);
                verify(&app_state, bearer.token()).map(|identity| MaybeAuthUser(Some(identity)))
            }
            Err(_) => Ok(MaybeAuthUser(None)),
        }
    }
}

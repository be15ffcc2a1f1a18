//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes live at the root.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admins, comments, content, health, reactions, users, watch};
use crate::state::AppState;

/// Create the API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(content_routes())
        .merge(comment_routes())
        .merge(reaction_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .route("/watch", get(watch::watch_handler))
}

fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/render", post(content::render))
        .route("/invites/:code", get(content::get_invite))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/targets/:target_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/comments/:comment_id",
            delete(comments::delete_comment),
        )
        .route(
            "/comments/:comment_id/pin",
            put(comments::pin_comment).delete(comments::unpin_comment),
        )
        .route("/moderation/comments", get(comments::moderation_feed))
}

fn reaction_routes() -> Router<AppState> {
    Router::new()
        .route("/targets/:target_id/reactions", get(reactions::get_reactions))
        .route(
            "/targets/:target_id/reactions/:kind",
            put(reactions::apply_reaction),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users/@me", get(users::get_current_user))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admins", get(admins::list_admins))
        .route(
            "/admins/:email",
            put(admins::add_admin).delete(admins::remove_admin),
        )
}

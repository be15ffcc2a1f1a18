//! Data transfer objects for API requests, responses and watch frames
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs and watch snapshots
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, DeleteCommentQuery, ListCommentsQuery, ModerationQuery, RenderRequest,
    TopicKind, WatchCommand,
};

pub use responses::{
    AdminChangeResponse, AdminListResponse, AuthorResponse, CommentResponse, CommentsSnapshot,
    CurrentUserResponse, HealthChecks, HealthResponse, ModerationFeed, ReactionApplied,
    ReactionState, ReadinessResponse, RenderedContent, TallyResponse, ThreadResponse, ViewerFlags,
};

pub use mappers::age_label;

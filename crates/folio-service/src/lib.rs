//! # folio-service
//!
//! Application layer: the comment and reaction engine, authorization,
//! content rendering, the change feed and live watch subscriptions.

pub mod dto;
pub mod feed;
pub mod services;
pub mod watch;

pub use feed::ChangeFeed;
pub use services::{
    AuthorizationService, CommentService, ContentService, InviteDetails, InviteLookup,
    ReactionGuard, ReactionService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, ServiceSettings,
};
pub use watch::{WatchEvent, WatchEvents, WatchPayload, WatchRegistry, WatchSnapshot};

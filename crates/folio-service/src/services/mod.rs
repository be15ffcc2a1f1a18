//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and orchestrate repositories, the
//! authorization policy and the change feed for one use case each.

pub mod authorization;
pub mod comment;
pub mod content;
pub mod context;
pub mod error;
pub mod guard;
pub mod invite;
pub mod reaction;

pub use authorization::AuthorizationService;
pub use comment::CommentService;
pub use content::ContentService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use guard::{GuardPermit, ReactionGuard};
pub use invite::{InviteDetails, InviteLookup};
pub use reaction::ReactionService;

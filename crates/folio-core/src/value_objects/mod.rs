//! Value objects - immutable types that represent domain concepts

mod authorization;
mod capabilities;
mod email;
mod ids;

pub use authorization::AuthorizationPolicy;
pub use capabilities::Capabilities;
pub use email::EmailAddress;
pub use ids::{CommentId, IdParseError, TargetId, UserId};

//! Axum extractors for request handling
//!
//! Custom extractors for identity tokens, validated bodies and typed path
//! parameters.

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, MaybeAuthUser};
pub use path::{CommentIdPath, ParsedPath, ReactionPath, TargetPath};
pub(crate) use validated::json_rejection;
pub use validated::{ParsedQuery, ValidatedJson, ValidatedQuery};

//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod reaction;

pub use comment::CommentModel;
pub use reaction::{ReactionChoiceModel, ReactionTallyModel};

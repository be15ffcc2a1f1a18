//! Repository ports

mod repositories;

pub use repositories::{AdminRepository, CommentRepository, ReactionRepository, RepoResult};

//! Domain entities - core business objects

mod admin;
mod comment;
mod identity;
mod reaction;

pub use admin::AdminAllowList;
pub use comment::{Comment, NewComment};
pub use identity::{initials, Identity};
pub use reaction::{
    ReactionChoice, ReactionKind, ReactionOutcome, ReactionTally, ReactionTransition, TallyDelta,
};

//! Reaction database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reaction_choices table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionChoiceModel {
    pub target_id: String,
    pub user_id: String,
    /// NULL is a tombstone
    pub kind: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for reaction_tallies table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionTallyModel {
    pub target_id: String,
    pub like_count: i64,
    pub dislike_count: i64,
    pub heart_count: i64,
}

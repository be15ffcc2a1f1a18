//! Comment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: Uuid,
    pub target_id: String,
    pub parent_id: Option<Uuid>,
    pub author_id: String,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub author_email: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub pinned: bool,
}

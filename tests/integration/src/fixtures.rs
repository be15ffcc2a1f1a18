//! Test fixtures and response shapes
//!
//! Identities for the usual cast of viewers plus the subset of response
//! fields the tests look at.

use std::sync::atomic::{AtomicU64, Ordering};

use folio_core::{Identity, UserId};
use serde::{Deserialize, Serialize};

use crate::helpers::ADMIN_DOMAIN;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique target so tests never share threads
pub fn unique_target() -> String {
    format!("article-{}", unique_suffix())
}

fn identity(uid: &str, name: &str, email: Option<String>) -> Identity {
    let mut identity = Identity::new(UserId::parse(uid).expect("valid user id"));
    identity.display_name = Some(name.to_string());
    identity.email_verified = email.is_some();
    identity.email = email;
    identity
}

/// Signed-in reader without privileges
pub fn reader() -> Identity {
    let suffix = unique_suffix();
    identity(
        &format!("reader-{suffix}"),
        "Rita Reader",
        Some(format!("rita{suffix}@example.com")),
    )
}

/// Admin by verified email domain
pub fn domain_admin() -> Identity {
    let suffix = unique_suffix();
    identity(
        &format!("admin-{suffix}"),
        "Ada Admin",
        Some(format!("ada{suffix}@{ADMIN_DOMAIN}")),
    )
}

/// Reader with a verified email that can be put on the allow-list
pub fn editor(email: &str) -> Identity {
    identity(&format!("editor-{}", unique_suffix()), "Ed Editor", Some(email.to_string()))
}

#[derive(Debug, Serialize)]
pub struct CreateCommentRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl CreateCommentRequest {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            parent_id: None,
        }
    }

    pub fn reply(parent_id: &str, text: &str) -> Self {
        Self {
            text: text.to_string(),
            parent_id: Some(parent_id.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub id: String,
    pub parent_id: Option<String>,
    pub text: String,
    pub pinned: bool,
    pub can_delete: bool,
    pub can_pin: bool,
    pub age_label: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadBody {
    pub comment: CommentBody,
    pub replies: Vec<CommentBody>,
}

#[derive(Debug, Deserialize)]
pub struct SnapshotBody {
    pub threads: Vec<ThreadBody>,
    pub hidden: usize,
    pub expanded: bool,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CountsBody {
    pub like: u64,
    pub dislike: u64,
    pub heart: u64,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReactionStateBody {
    pub counts: CountsBody,
    pub viewer_choice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReactionAppliedBody {
    pub applied: bool,
    pub state: ReactionStateBody,
}

#[derive(Debug, Deserialize)]
pub struct CurrentUserBody {
    pub uid: String,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdminChangeBody {
    pub email: String,
    pub changed: bool,
}

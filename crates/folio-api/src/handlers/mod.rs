//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admins;
pub mod comments;
pub mod content;
pub mod health;
pub mod reactions;
pub mod users;
pub mod watch;

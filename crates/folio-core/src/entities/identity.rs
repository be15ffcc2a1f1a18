//! Identity of the current session as reported by the identity provider

use serde::{Deserialize, Serialize};

use crate::value_objects::{EmailAddress, UserId};

/// Fallback shown when neither a display name nor an e-mail is available
const ANONYMOUS_NAME: &str = "User";

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: UserId,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
}

impl Identity {
    /// Create an identity with no optional profile data
    pub fn new(uid: UserId) -> Self {
        Self {
            uid,
            display_name: None,
            photo_url: None,
            email: None,
            email_verified: false,
        }
    }

    /// The e-mail, only if the provider verified it and it parses
    pub fn verified_email(&self) -> Option<EmailAddress> {
        if !self.email_verified {
            return None;
        }
        self.email
            .as_deref()
            .and_then(|e| EmailAddress::parse(e).ok())
    }

    /// Name to show next to the user's comments.
    ///
    /// Providers sometimes send the literal string "null", which is treated
    /// as missing. Falls back to the e-mail local part, then a generic label.
    pub fn resolved_display_name(&self) -> String {
        if let Some(name) = self.display_name.as_deref().map(str::trim) {
            if !name.is_empty() && name != "null" {
                return name.to_string();
            }
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .map(str::trim)
            .filter(|local| !local.is_empty())
            .map_or_else(|| ANONYMOUS_NAME.to_string(), str::to_string)
    }

    pub fn initials(&self) -> String {
        initials(&self.resolved_display_name())
    }
}

/// Up to two uppercase initials for an avatar placeholder, "?" if there are none
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

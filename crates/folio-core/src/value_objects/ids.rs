//! Identifiers for targets, users and comments
//!
//! Targets and users are keyed by opaque strings handed to us by the content
//! editor and the identity provider. Comments get a UUID assigned on creation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Maximum length accepted for target and user keys
const MAX_KEY_LEN: usize = 128;

/// Error returned when an identifier fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("identifier must not be empty")]
    Empty,

    #[error("identifier exceeds {MAX_KEY_LEN} characters")]
    TooLong,

    #[error("identifier contains invalid character {0:?}")]
    InvalidChar(char),

    #[error("invalid comment id: {0}")]
    InvalidUuid(String),
}

fn validate_key(raw: &str) -> Result<(), IdParseError> {
    if raw.is_empty() {
        return Err(IdParseError::Empty);
    }
    if raw.chars().count() > MAX_KEY_LEN {
        return Err(IdParseError::TooLong);
    }
    if let Some(c) = raw.chars().find(|c| c.is_whitespace() || *c == '/') {
        return Err(IdParseError::InvalidChar(c));
    }
    Ok(())
}

macro_rules! string_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a raw key
            pub fn parse(raw: impl Into<String>) -> Result<Self, IdParseError> {
                let raw = raw.into();
                validate_key(&raw)?;
                Ok(Self(raw))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_key! {
    /// The content item (article, project, game, tool) that comments and
    /// reactions attach to
    TargetId
}

string_key! {
    /// Stable user id issued by the identity provider
    UserId
}

/// Globally unique, immutable comment id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdParseError::InvalidUuid(s.to_string()))
    }
}

impl From<Uuid> for CommentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<CommentId> for Uuid {
    fn from(id: CommentId) -> Self {
        id.0
    }
}

//! Capability flags granted by the authorization policy

use bitflags::bitflags;
use serde::{Serialize, Serializer};

bitflags! {
    /// What an identity may do beyond reading, commenting and reacting
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Pin or unpin any top-level comment
        const PIN_COMMENTS       = 1 << 0;
        /// Delete comments written by other users
        const DELETE_ANY_COMMENT = 1 << 1;
        /// Create and edit articles, projects and other content
        const EDIT_CONTENT       = 1 << 2;
        /// Add or remove entries of the admin allow-list
        const MANAGE_ADMINS      = 1 << 3;

        /// Everything an admin can do
        const ADMIN = Self::PIN_COMMENTS.bits()
            | Self::DELETE_ANY_COMMENT.bits()
            | Self::EDIT_CONTENT.bits()
            | Self::MANAGE_ADMINS.bits();
    }
}

impl Capabilities {
    /// Names of the individual flags that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

// Serialized as a list of flag names, e.g. ["PIN_COMMENTS", "DELETE_ANY_COMMENT"]
impl Serialize for Capabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.list())
    }
}

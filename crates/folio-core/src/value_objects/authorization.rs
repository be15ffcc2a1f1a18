//! Admin authorization policy
//!
//! An identity is an admin when its verified e-mail either belongs to the
//! organizational domain or is listed in the shared allow-list. The policy is
//! built from a fresh allow-list snapshot for every check and is never cached
//! across requests.

use crate::entities::{AdminAllowList, Comment, Identity};
use crate::value_objects::{Capabilities, EmailAddress};

/// Domain suffix rule plus allow-list snapshot
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    domain_suffix: Option<String>,
    allow_list: AdminAllowList,
}

impl AuthorizationPolicy {
    /// Create a policy. The suffix may be given as `example.org` or `@example.org`;
    /// a blank suffix disables the domain rule.
    pub fn new(domain_suffix: Option<&str>, allow_list: AdminAllowList) -> Self {
        let domain_suffix = domain_suffix
            .map(|s| s.trim().trim_start_matches('@').to_lowercase())
            .filter(|s| !s.is_empty());
        Self {
            domain_suffix,
            allow_list,
        }
    }

    #[inline]
    pub fn domain_suffix(&self) -> Option<&str> {
        self.domain_suffix.as_deref()
    }

    #[inline]
    pub fn allow_list(&self) -> &AdminAllowList {
        &self.allow_list
    }

    fn matches_domain(&self, email: &EmailAddress) -> bool {
        self.domain_suffix
            .as_deref()
            .is_some_and(|suffix| email.domain() == suffix)
    }

    /// True if the identity's verified e-mail matches the domain rule or the allow-list
    pub fn is_admin(&self, identity: &Identity) -> bool {
        let Some(email) = identity.verified_email() else {
            return false;
        };
        self.matches_domain(&email) || self.allow_list.contains(&email)
    }

    /// Capabilities for an optional identity. Anonymous viewers get none.
    pub fn capabilities(&self, identity: Option<&Identity>) -> Capabilities {
        match identity {
            Some(identity) if self.is_admin(identity) => Capabilities::ADMIN,
            _ => Capabilities::empty(),
        }
    }

    /// Authors may delete their own comments, admins may delete any
    pub fn can_delete(&self, identity: &Identity, comment: &Comment) -> bool {
        comment.author_id == identity.uid
            || self
                .capabilities(Some(identity))
                .contains(Capabilities::DELETE_ANY_COMMENT)
    }

    /// Only admins pin, and only top-level comments can be pinned
    pub fn can_pin(&self, identity: &Identity, comment: &Comment) -> bool {
        !comment.is_reply()
            && self
                .capabilities(Some(identity))
                .contains(Capabilities::PIN_COMMENTS)
    }
}

//! Shared admin allow-list

use std::collections::BTreeSet;

use crate::value_objects::EmailAddress;

/// Set of e-mail addresses granted admin rights explicitly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: BTreeSet<EmailAddress>,
}

impl AdminAllowList {
    pub fn contains(&self, email: &EmailAddress) -> bool {
        self.emails.contains(email)
    }

    /// Returns false if the address was already listed
    pub fn insert(&mut self, email: EmailAddress) -> bool {
        self.emails.insert(email)
    }

    /// Returns false if the address was not listed
    pub fn remove(&mut self, email: &EmailAddress) -> bool {
        self.emails.remove(email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmailAddress> {
        self.emails.iter()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl FromIterator<EmailAddress> for AdminAllowList {
    fn from_iter<I: IntoIterator<Item = EmailAddress>>(iter: I) -> Self {
        Self {
            emails: iter.into_iter().collect(),
        }
    }
}

//! Service context - the explicit application context shared by services
//!
//! Holds the repositories, the identity verifier, the change feed, the
//! reaction guard and the tunables read from configuration. Built once at
//! startup, cloned into request handlers and watch tasks, disposed on
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use folio_common::{AppConfig, IdentityVerifier};
use folio_core::traits::{AdminRepository, CommentRepository, ReactionRepository};
use folio_core::DEFAULT_VISIBLE_THREADS;

use super::error::{ServiceError, ServiceResult};
use super::guard::ReactionGuard;
use super::invite::InviteLookup;
use crate::feed::ChangeFeed;

/// Tunables of the comment and reaction engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub admin_email_domain: Option<String>,
    pub max_comment_length: usize,
    pub visible_threads: usize,
    pub reaction_cooldown: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            admin_email_domain: None,
            max_comment_length: 2000,
            visible_threads: DEFAULT_VISIBLE_THREADS,
            reaction_cooldown: Duration::from_millis(500),
        }
    }
}

impl From<&AppConfig> for ServiceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            admin_email_domain: config.authorization.admin_email_domain.clone(),
            max_comment_length: config.comments.max_length,
            visible_threads: config.comments.visible_threads,
            reaction_cooldown: config.reactions.cooldown(),
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    comment_repo: Arc<dyn CommentRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    admin_repo: Arc<dyn AdminRepository>,

    identity: Arc<IdentityVerifier>,
    feed: ChangeFeed,
    reaction_guard: ReactionGuard,
    invites: Option<InviteLookup>,

    settings: Arc<ServiceSettings>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn admin_repo(&self) -> &dyn AdminRepository {
        self.admin_repo.as_ref()
    }

    // === Infrastructure ===

    pub fn identity(&self) -> &IdentityVerifier {
        self.identity.as_ref()
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub fn reaction_guard(&self) -> &ReactionGuard {
        &self.reaction_guard
    }

    /// `None` when invite lookups are disabled
    pub fn invites(&self) -> Option<&InviteLookup> {
        self.invites.as_ref()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Release background resources. Request handling keeps working on the
    /// local feed afterwards.
    pub async fn dispose(&self) {
        self.feed.shutdown().await;
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("feed", &self.feed)
            .field("invites", &self.invites.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    comment_repo: Option<Arc<dyn CommentRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    admin_repo: Option<Arc<dyn AdminRepository>>,
    identity: Option<Arc<IdentityVerifier>>,
    feed: Option<ChangeFeed>,
    invites: Option<InviteLookup>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn admin_repo(mut self, repo: Arc<dyn AdminRepository>) -> Self {
        self.admin_repo = Some(repo);
        self
    }

    /// Use one store for all three repositories
    pub fn store<S>(self, store: S) -> Self
    where
        S: CommentRepository + ReactionRepository + AdminRepository + 'static,
    {
        let store = Arc::new(store);
        self.comment_repo(store.clone())
            .reaction_repo(store.clone())
            .admin_repo(store)
    }

    pub fn identity(mut self, verifier: Arc<IdentityVerifier>) -> Self {
        self.identity = Some(verifier);
        self
    }

    pub fn feed(mut self, feed: ChangeFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn invites(mut self, lookup: InviteLookup) -> Self {
        self.invites = Some(lookup);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// # Errors
    /// Returns `ServiceError::Validation` if a required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::validation(format!("{name} is required"));
        Ok(ServiceContext {
            comment_repo: self.comment_repo.ok_or_else(|| missing("comment_repo"))?,
            reaction_repo: self.reaction_repo.ok_or_else(|| missing("reaction_repo"))?,
            admin_repo: self.admin_repo.ok_or_else(|| missing("admin_repo"))?,
            identity: self.identity.ok_or_else(|| missing("identity"))?,
            feed: self.feed.unwrap_or_default(),
            reaction_guard: ReactionGuard::new(self.settings.reaction_cooldown),
            invites: self.invites,
            settings: Arc::new(self.settings),
        })
    }
}

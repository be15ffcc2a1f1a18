//! Authorization service
//!
//! Resolves admin rights from the configured e-mail domain and the shared
//! allow-list, and manages the allow-list itself.

use chrono::Utc;
use folio_core::events::AdminListChangedEvent;
use folio_core::{AuthorizationPolicy, Capabilities, DomainError, DomainEvent, EmailAddress, Identity};
use tracing::{info, instrument};

use crate::dto::{AdminChangeResponse, AdminListResponse, CurrentUserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authorization service for access control
pub struct AuthorizationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthorizationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Policy over a fresh allow-list snapshot. Never cache the result
    /// beyond the operation at hand.
    #[instrument(skip(self))]
    pub async fn policy(&self) -> ServiceResult<AuthorizationPolicy> {
        let allow_list = self.ctx.admin_repo().load().await?;
        Ok(AuthorizationPolicy::new(
            self.ctx.settings().admin_email_domain.as_deref(),
            allow_list,
        ))
    }

    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn is_admin(&self, identity: &Identity) -> ServiceResult<bool> {
        Ok(self.policy().await?.is_admin(identity))
    }

    pub async fn capabilities(&self, identity: Option<&Identity>) -> ServiceResult<Capabilities> {
        Ok(self.policy().await?.capabilities(identity))
    }

    /// Fail unless the identity holds every flag in `required`
    pub async fn require(&self, identity: &Identity, required: Capabilities) -> ServiceResult<()> {
        let granted = self.capabilities(Some(identity)).await?;
        if !granted.contains(required) {
            return Err(DomainError::MissingCapability(required.list().join(", ")).into());
        }
        Ok(())
    }

    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn current_user(&self, identity: &Identity) -> ServiceResult<CurrentUserResponse> {
        let capabilities = self.capabilities(Some(identity)).await?;
        Ok(CurrentUserResponse::new(identity, capabilities))
    }

    // === Allow-list management ===

    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn list_admins(&self, identity: &Identity) -> ServiceResult<AdminListResponse> {
        let policy = self.policy().await?;
        if !policy
            .capabilities(Some(identity))
            .contains(Capabilities::MANAGE_ADMINS)
        {
            return Err(DomainError::MissingCapability("MANAGE_ADMINS".to_string()).into());
        }

        Ok(AdminListResponse {
            admins: policy.allow_list().iter().cloned().collect(),
            domain_suffix: policy.domain_suffix().map(str::to_string),
        })
    }

    /// Add an address to the allow-list. Adding a listed address is a no-op.
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn add_admin(
        &self,
        identity: &Identity,
        email: &str,
    ) -> ServiceResult<AdminChangeResponse> {
        self.require(identity, Capabilities::MANAGE_ADMINS).await?;
        let email = EmailAddress::parse(email)?;

        let changed = self.ctx.admin_repo().add(&email).await?;
        if changed {
            info!(email = %email, by = %identity.uid, "Admin added");
            self.publish_changed().await;
        }
        Ok(AdminChangeResponse { email, changed })
    }

    /// Remove an address from the allow-list
    ///
    /// # Errors
    /// `AdminNotListed` if the address is not on the list. Admins granted by
    /// the domain rule cannot be removed here.
    #[instrument(skip(self, identity), fields(uid = %identity.uid))]
    pub async fn remove_admin(
        &self,
        identity: &Identity,
        email: &str,
    ) -> ServiceResult<AdminChangeResponse> {
        self.require(identity, Capabilities::MANAGE_ADMINS).await?;
        let email = EmailAddress::parse(email)?;

        if !self.ctx.admin_repo().remove(&email).await? {
            return Err(DomainError::AdminNotListed(email.to_string()).into());
        }
        info!(email = %email, by = %identity.uid, "Admin removed");
        self.publish_changed().await;

        Ok(AdminChangeResponse {
            email,
            changed: true,
        })
    }

    async fn publish_changed(&self) {
        self.ctx
            .feed()
            .publish(DomainEvent::AdminListChanged(AdminListChangedEvent {
                timestamp: Utc::now(),
            }))
            .await;
    }
}

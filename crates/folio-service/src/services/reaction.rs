//! Reaction service
//!
//! Per-user exclusive reactions (like, dislike, heart) with aggregate
//! tallies. The store applies the choice and the tally delta atomically;
//! the re-entrancy guard absorbs repeated clicks before they get there.

use chrono::Utc;
use folio_core::events::ReactionChangedEvent;
use folio_core::{DomainEvent, Identity, ReactionKind, TargetId};
use tracing::{debug, info, instrument};

use crate::dto::{ReactionApplied, ReactionState};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tally of a target plus the viewer's own choice
    #[instrument(skip(self, viewer))]
    pub async fn state(
        &self,
        target_id: &TargetId,
        viewer: Option<&Identity>,
    ) -> ServiceResult<ReactionState> {
        let tally = self.ctx.reaction_repo().tally(target_id).await?;
        let choice = match viewer {
            Some(identity) => {
                self.ctx
                    .reaction_repo()
                    .choice(target_id, &identity.uid)
                    .await?
            }
            None => None,
        };
        Ok(ReactionState::new(&tally, choice.as_ref()))
    }

    /// Click a reaction: set it, switch to it, or toggle it off.
    ///
    /// While the same user has a request in flight for the target (or its
    /// cooldown runs) nothing is written and `applied` is false.
    ///
    /// # Errors
    /// `NotAuthenticated` without an identity; store failures as-is
    #[instrument(skip(self, identity))]
    pub async fn apply_reaction(
        &self,
        target_id: &TargetId,
        identity: Option<&Identity>,
        kind: ReactionKind,
    ) -> ServiceResult<ReactionApplied> {
        let identity = identity.ok_or_else(ServiceError::unauthenticated)?;

        let Some(_permit) = self
            .ctx
            .reaction_guard()
            .try_acquire(target_id, &identity.uid)
        else {
            debug!(target_id = %target_id, uid = %identity.uid, "Reaction throttled");
            return Ok(ReactionApplied {
                applied: false,
                state: self.state(target_id, Some(identity)).await?,
            });
        };

        let outcome = self
            .ctx
            .reaction_repo()
            .apply(target_id, &identity.uid, kind)
            .await?;
        info!(
            target_id = %target_id,
            uid = %identity.uid,
            previous = ?outcome.transition.previous,
            next = ?outcome.transition.next,
            "Reaction applied"
        );

        self.ctx
            .feed()
            .publish(DomainEvent::ReactionChanged(ReactionChangedEvent {
                target_id: target_id.clone(),
                user_id: identity.uid.clone(),
                kind: outcome.transition.next,
                timestamp: outcome.choice.updated_at,
            }))
            .await;

        Ok(ReactionApplied {
            applied: true,
            state: ReactionState::new(&outcome.tally, Some(&outcome.choice)),
        })
    }
}

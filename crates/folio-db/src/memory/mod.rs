//! In-memory store implementing every repository trait
//!
//! Backs `STORE_BACKEND=memory` and the test suites. Timestamps are strictly
//! increasing so ordering by `created_at` is deterministic even for comments
//! written within the same clock tick.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::instrument;

use folio_core::traits::{AdminRepository, CommentRepository, ReactionRepository, RepoResult};
use folio_core::{
    AdminAllowList, Comment, CommentId, DomainError, EmailAddress, NewComment, ReactionChoice,
    ReactionKind, ReactionOutcome, ReactionTally, ReactionTransition, TargetId, UserId,
};

#[derive(Default)]
struct Reactions {
    choices: HashMap<(TargetId, UserId), ReactionChoice>,
    tallies: HashMap<TargetId, ReactionTally>,
}

#[derive(Default)]
struct Inner {
    comments: RwLock<HashMap<CommentId, Comment>>,
    /// One lock over choices and tallies makes `apply` atomic
    reactions: Mutex<Reactions>,
    admins: RwLock<AdminAllowList>,
    last_timestamp: Mutex<Option<DateTime<Utc>>>,
    unavailable: AtomicBool,
}

/// Shared in-memory store; clones share state
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a database error, as if the backing
    /// store went away
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("store unavailable".to_string()));
        }
        Ok(())
    }

    /// Strictly increasing wall-clock timestamp
    fn now(&self) -> DateTime<Utc> {
        let mut last = self.inner.last_timestamp.lock();
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("comments", &self.inner.comments.read().len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        self.check()?;
        Ok(self.inner.comments.read().get(&id).cloned())
    }

    async fn find_by_target(&self, target_id: &TargetId) -> RepoResult<Vec<Comment>> {
        self.check()?;
        let mut comments: Vec<Comment> = self
            .inner
            .comments
            .read()
            .values()
            .filter(|c| &c.target_id == target_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Comment>> {
        self.check()?;
        let limit = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
        let mut comments: Vec<Comment> = self.inner.comments.read().values().cloned().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments.truncate(limit);
        Ok(comments)
    }

    async fn count(&self) -> RepoResult<i64> {
        self.check()?;
        Ok(i64::try_from(self.inner.comments.read().len()).unwrap_or(i64::MAX))
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &NewComment) -> RepoResult<Comment> {
        self.check()?;
        let stored = comment.clone().into_comment(self.now());
        let mut comments = self.inner.comments.write();
        if comments.contains_key(&stored.id) {
            return Err(DomainError::WriteRejected(format!(
                "comment {} already exists",
                stored.id
            )));
        }
        comments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn set_pinned(&self, id: CommentId, pinned: bool) -> RepoResult<Comment> {
        self.check()?;
        let mut comments = self.inner.comments.write();
        let comment = comments
            .get_mut(&id)
            .ok_or(DomainError::CommentNotFound(id))?;
        comment.pinned = pinned;
        Ok(comment.clone())
    }

    async fn delete(&self, id: CommentId) -> RepoResult<()> {
        self.check()?;
        self.inner
            .comments
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::CommentNotFound(id))
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn tally(&self, target_id: &TargetId) -> RepoResult<ReactionTally> {
        self.check()?;
        Ok(self
            .inner
            .reactions
            .lock()
            .tallies
            .get(target_id)
            .cloned()
            .unwrap_or_else(|| ReactionTally::empty(target_id.clone())))
    }

    async fn choice(
        &self,
        target_id: &TargetId,
        user_id: &UserId,
    ) -> RepoResult<Option<ReactionChoice>> {
        self.check()?;
        Ok(self
            .inner
            .reactions
            .lock()
            .choices
            .get(&(target_id.clone(), user_id.clone()))
            .cloned())
    }

    #[instrument(skip(self), fields(target_id = %target_id, user_id = %user_id))]
    async fn apply(
        &self,
        target_id: &TargetId,
        user_id: &UserId,
        requested: ReactionKind,
    ) -> RepoResult<ReactionOutcome> {
        self.check()?;
        let now = self.now();
        let mut reactions = self.inner.reactions.lock();

        let key = (target_id.clone(), user_id.clone());
        let current = reactions.choices.get(&key).and_then(|c| c.kind);
        let transition = ReactionTransition::resolve(current, requested);

        let choice = ReactionChoice {
            target_id: target_id.clone(),
            user_id: user_id.clone(),
            kind: transition.next,
            updated_at: now,
        };
        reactions.choices.insert(key, choice.clone());

        let tally = reactions
            .tallies
            .entry(target_id.clone())
            .or_insert_with(|| ReactionTally::empty(target_id.clone()));
        tally.apply(transition.delta);
        let tally = tally.clone();

        Ok(ReactionOutcome {
            transition,
            choice,
            tally,
        })
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn load(&self) -> RepoResult<AdminAllowList> {
        self.check()?;
        Ok(self.inner.admins.read().clone())
    }

    async fn add(&self, email: &EmailAddress) -> RepoResult<bool> {
        self.check()?;
        Ok(self.inner.admins.write().insert(email.clone()))
    }

    async fn remove(&self, email: &EmailAddress) -> RepoResult<bool> {
        self.check()?;
        Ok(self.inner.admins.write().remove(email))
    }
}

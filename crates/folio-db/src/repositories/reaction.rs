//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use folio_core::traits::{ReactionRepository, RepoResult};
use folio_core::{
    ReactionChoice, ReactionKind, ReactionOutcome, ReactionTally, ReactionTransition, TargetId,
    UserId,
};

use crate::mappers::parse_kind;
use crate::models::{ReactionChoiceModel, ReactionTallyModel};

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self), fields(target_id = %target_id))]
    async fn tally(&self, target_id: &TargetId) -> RepoResult<ReactionTally> {
        let result = sqlx::query_as::<_, ReactionTallyModel>(
            r#"
            SELECT target_id, like_count, dislike_count, heart_count
            FROM reaction_tallies
            WHERE target_id = $1
            "#,
        )
        .bind(target_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match result {
            Some(row) => ReactionTally::try_from(row),
            None => Ok(ReactionTally::empty(target_id.clone())),
        }
    }

    #[instrument(skip(self), fields(target_id = %target_id, user_id = %user_id))]
    async fn choice(
        &self,
        target_id: &TargetId,
        user_id: &UserId,
    ) -> RepoResult<Option<ReactionChoice>> {
        let result = sqlx::query_as::<_, ReactionChoiceModel>(
            r#"
            SELECT target_id, user_id, kind, updated_at
            FROM reaction_choices
            WHERE target_id = $1 AND user_id = $2
            "#,
        )
        .bind(target_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReactionChoice::try_from).transpose()
    }

    /// Choice and tally move in one transaction. The choice row is locked
    /// for the duration, so concurrent clicks by the same user serialize.
    #[instrument(skip(self), fields(target_id = %target_id, user_id = %user_id))]
    async fn apply(
        &self,
        target_id: &TargetId,
        user_id: &UserId,
        requested: ReactionKind,
    ) -> RepoResult<ReactionOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO reaction_choices (target_id, user_id, kind)
            VALUES ($1, $2, NULL)
            ON CONFLICT (target_id, user_id) DO NOTHING
            "#,
        )
        .bind(target_id.as_str())
        .bind(user_id.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let current = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT kind
            FROM reaction_choices
            WHERE target_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(target_id.as_str())
        .bind(user_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let transition = ReactionTransition::resolve(parse_kind(current.as_deref())?, requested);

        let choice = sqlx::query_as::<_, ReactionChoiceModel>(
            r#"
            UPDATE reaction_choices
            SET kind = $3, updated_at = clock_timestamp()
            WHERE target_id = $1 AND user_id = $2
            RETURNING target_id, user_id, kind, updated_at
            "#,
        )
        .bind(target_id.as_str())
        .bind(user_id.as_str())
        .bind(transition.next.map(|kind| kind.as_str()))
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let delta = transition.delta;
        let tally = sqlx::query_as::<_, ReactionTallyModel>(
            r#"
            INSERT INTO reaction_tallies (target_id, like_count, dislike_count, heart_count)
            VALUES ($1, GREATEST($2, 0), GREATEST($3, 0), GREATEST($4, 0))
            ON CONFLICT (target_id) DO UPDATE SET
                like_count = GREATEST(reaction_tallies.like_count + $2, 0),
                dislike_count = GREATEST(reaction_tallies.dislike_count + $3, 0),
                heart_count = GREATEST(reaction_tallies.heart_count + $4, 0)
            RETURNING target_id, like_count, dislike_count, heart_count
            "#,
        )
        .bind(target_id.as_str())
        .bind(delta.like)
        .bind(delta.dislike)
        .bind(delta.heart)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        debug!(
            previous = ?transition.previous,
            next = ?transition.next,
            "Reaction applied"
        );

        Ok(ReactionOutcome {
            transition,
            choice: ReactionChoice::try_from(choice)?,
            tally: ReactionTally::try_from(tally)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReactionRepository>();
    }
}

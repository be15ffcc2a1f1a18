//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use folio_core::traits::{CommentRepository, RepoResult};
use folio_core::{Comment, CommentId, NewComment, TargetId};

use crate::mappers::CommentInsert;
use crate::models::CommentModel;

use super::error::{comment_not_found, map_db_error};

/// Upper bound for moderation listings
const MAX_RECENT: i64 = 500;

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, target_id, parent_id, author_id, author_display_name,
                   author_photo_url, author_email, text, created_at, pinned
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Comment::try_from).transpose()
    }

    #[instrument(skip(self), fields(target_id = %target_id))]
    async fn find_by_target(&self, target_id: &TargetId) -> RepoResult<Vec<Comment>> {
        let results = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, target_id, parent_id, author_id, author_display_name,
                   author_photo_url, author_email, text, created_at, pinned
            FROM comments
            WHERE target_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(target_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Comment::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Comment>> {
        let limit = limit.clamp(1, MAX_RECENT);

        let results = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, target_id, parent_id, author_id, author_display_name,
                   author_photo_url, author_email, text, created_at, pinned
            FROM comments
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Comment::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id, target_id = %comment.target_id))]
    async fn create(&self, comment: &NewComment) -> RepoResult<Comment> {
        let insert = CommentInsert::new(comment);

        let row = sqlx::query_as::<_, CommentModel>(
            r#"
            INSERT INTO comments (id, target_id, parent_id, author_id, author_display_name,
                                  author_photo_url, author_email, text)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, target_id, parent_id, author_id, author_display_name,
                      author_photo_url, author_email, text, created_at, pinned
            "#,
        )
        .bind(insert.id)
        .bind(insert.target_id)
        .bind(insert.parent_id)
        .bind(insert.author_id)
        .bind(insert.author_display_name)
        .bind(insert.author_photo_url)
        .bind(insert.author_email)
        .bind(insert.text)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Comment::try_from(row)
    }

    #[instrument(skip(self))]
    async fn set_pinned(&self, id: CommentId, pinned: bool) -> RepoResult<Comment> {
        let row = sqlx::query_as::<_, CommentModel>(
            r#"
            UPDATE comments
            SET pinned = $2
            WHERE id = $1
            RETURNING id, target_id, parent_id, author_id, author_display_name,
                      author_photo_url, author_email, text, created_at, pinned
            "#,
        )
        .bind(id.into_inner())
        .bind(pinned)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| comment_not_found(id))?;

        Comment::try_from(row)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CommentId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(comment_not_found(id));
        }

        Ok(())
    }
}

//! PostgreSQL implementation of AdminRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use folio_core::traits::{AdminRepository, RepoResult};
use folio_core::{AdminAllowList, EmailAddress};

use super::error::map_db_error;

/// PostgreSQL implementation of AdminRepository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    #[instrument(skip(self))]
    async fn load(&self) -> RepoResult<AdminAllowList> {
        let rows = sqlx::query_scalar::<_, String>("SELECT email FROM admin_emails ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|raw| match EmailAddress::parse(&raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    warn!(email = %raw, "Ignoring malformed admin e-mail");
                    None
                }
            })
            .collect())
    }

    #[instrument(skip(self), fields(email = %email))]
    async fn add(&self, email: &EmailAddress) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO admin_emails (email)
            VALUES ($1)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(email = %email))]
    async fn remove(&self, email: &EmailAddress) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM admin_emails WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }
}

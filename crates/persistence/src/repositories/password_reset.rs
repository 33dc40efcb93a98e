//! Password reset repository.
//!
//! Rows store only the SHA-256 digest of the emailed token. Issuing a new
//! token replaces any prior rows for the user, and consumed rows are deleted
//! so a (email, token) pair can never be replayed.

use chrono::{DateTime, Utc};
use domain::models::PasswordReset;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PasswordResetEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, user_id, token_digest, expires_at, created_at";

#[derive(Clone)]
pub struct PasswordResetRepository {
    pool: PgPool,
}

impl PasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replaces any pending reset for the user with a fresh one.
    pub async fn replace_for_user(
        &self,
        user_id: Uuid,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordReset, sqlx::Error> {
        let timer = QueryTimer::new("replace_password_reset");
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM password_resets WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let entity = sqlx::query_as::<_, PasswordResetEntity>(&format!(
            "INSERT INTO password_resets (user_id, token_digest, expires_at) \
             VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        ))
        .bind(user_id)
        .bind(token_digest)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(PasswordReset::from(entity))
    }

    /// Finds an unexpired reset matching a token digest.
    pub async fn find_valid(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let timer = QueryTimer::new("find_valid_password_reset");
        let entity = sqlx::query_as::<_, PasswordResetEntity>(&format!(
            "SELECT {} FROM password_resets WHERE token_digest = $1 AND expires_at > $2",
            COLUMNS
        ))
        .bind(token_digest)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(PasswordReset::from))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_password_reset");
        let result = sqlx::query("DELETE FROM password_resets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

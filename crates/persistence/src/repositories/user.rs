//! User repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::User;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, email, password_hash, role, subscription_expiration, \
     xc_username, xc_password, server_url, vod_enabled, custom_services, \
     referral_code, preferences, trial_status, payment_status, created_at, updated_at";

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub subscription_expiration: Option<DateTime<Utc>>,
    pub xc_username: Option<String>,
    pub xc_password: Option<String>,
    pub server_url: Option<String>,
    pub vod_enabled: bool,
    pub custom_services: serde_json::Value,
    pub referral_code: String,
    pub trial_status: bool,
}

/// Partial update for a user; None fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub role: Option<String>,
    pub subscription_expiration: Option<Option<DateTime<Utc>>>,
    pub xc_username: Option<String>,
    pub xc_password: Option<String>,
    pub server_url: Option<String>,
    pub vod_enabled: Option<bool>,
    pub custom_services: Option<serde_json::Value>,
    pub trial_status: Option<bool>,
    pub payment_status: Option<String>,
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(User::from))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(User::from))
    }

    /// Lists users for the admin panel, newest first, optionally filtered by
    /// a case-insensitive email substring.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let timer = QueryTimer::new("list_users");
        let pattern = search.map(|s| format!("%{}%", s)).unwrap_or_else(|| "%".to_string());
        let entities = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users WHERE email ILIKE $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            USER_COLUMNS
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(User::from).collect())
    }

    pub async fn count(&self, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let pattern = search.map(|s| format!("%{}%", s)).unwrap_or_else(|| "%".to_string());
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email ILIKE $1")
            .bind(pattern)
            .fetch_one(&self.pool)
            .await?;
        timer.record();
        Ok(count.0)
    }

    pub async fn create(&self, input: CreateUserInput) -> Result<User, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "INSERT INTO users (email, password_hash, role, subscription_expiration, \
             xc_username, xc_password, server_url, vod_enabled, custom_services, \
             referral_code, trial_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.role)
        .bind(input.subscription_expiration)
        .bind(&input.xc_username)
        .bind(&input.xc_password)
        .bind(&input.server_url)
        .bind(input.vod_enabled)
        .bind(&input.custom_services)
        .bind(&input.referral_code)
        .bind(input.trial_status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(User::from)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<Option<User>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        // Double-Option on subscription_expiration distinguishes "leave as is"
        // from "clear the expiration".
        let clear_expiration = matches!(input.subscription_expiration, Some(None));
        let new_expiration = input.subscription_expiration.flatten();
        let entity = sqlx::query_as::<_, UserEntity>(&format!(
            "UPDATE users SET \
             email = COALESCE($2, email), \
             role = COALESCE($3, role), \
             subscription_expiration = CASE WHEN $4 THEN NULL \
                 ELSE COALESCE($5, subscription_expiration) END, \
             xc_username = COALESCE($6, xc_username), \
             xc_password = COALESCE($7, xc_password), \
             server_url = COALESCE($8, server_url), \
             vod_enabled = COALESCE($9, vod_enabled), \
             custom_services = COALESCE($10, custom_services), \
             trial_status = COALESCE($11, trial_status), \
             payment_status = COALESCE($12, payment_status), \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&input.email)
        .bind(&input.role)
        .bind(clear_expiration)
        .bind(new_expiration)
        .bind(&input.xc_username)
        .bind(&input.xc_password)
        .bind(&input.server_url)
        .bind(input.vod_enabled)
        .bind(&input.custom_services)
        .bind(input.trial_status)
        .bind(&input.payment_status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(User::from))
    }

    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_user_password");
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Deletes the given users and returns how many rows were removed.
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_users_bulk");
        let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Applies the same partial update to every listed user. Binds every
    /// column the single-row update does except email, which is unique per
    /// user and must never be bulk-applied.
    pub async fn update_many(
        &self,
        ids: &[Uuid],
        input: UpdateUserInput,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_users_bulk");
        let clear_expiration = matches!(input.subscription_expiration, Some(None));
        let new_expiration = input.subscription_expiration.flatten();
        let result = sqlx::query(
            "UPDATE users SET \
             role = COALESCE($2, role), \
             subscription_expiration = CASE WHEN $3 THEN NULL \
                 ELSE COALESCE($4, subscription_expiration) END, \
             xc_username = COALESCE($5, xc_username), \
             xc_password = COALESCE($6, xc_password), \
             server_url = COALESCE($7, server_url), \
             vod_enabled = COALESCE($8, vod_enabled), \
             custom_services = COALESCE($9, custom_services), \
             trial_status = COALESCE($10, trial_status), \
             payment_status = COALESCE($11, payment_status), \
             updated_at = NOW() \
             WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(&input.role)
        .bind(clear_expiration)
        .bind(new_expiration)
        .bind(&input.xc_username)
        .bind(&input.xc_password)
        .bind(&input.server_url)
        .bind(input.vod_enabled)
        .bind(&input.custom_services)
        .bind(input.trial_status)
        .bind(&input.payment_status)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Users whose subscription expires within the given horizon. The daily
    /// sweep only cares about the next few days, so the scan is bounded.
    pub async fn list_expiring_within(
        &self,
        now: DateTime<Utc>,
        horizon_days: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let timer = QueryTimer::new("list_users_expiring");
        let entities = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {} FROM users \
             WHERE subscription_expiration IS NOT NULL \
               AND subscription_expiration > $1 \
               AND subscription_expiration <= $1 + ($2 || ' days')::interval",
            USER_COLUMNS
        ))
        .bind(now)
        .bind(horizon_days.to_string())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(User::from).collect())
    }
}

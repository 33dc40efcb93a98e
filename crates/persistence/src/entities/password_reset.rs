//! Password reset entity.

use chrono::{DateTime, Utc};
use domain::models::PasswordReset;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<PasswordResetEntity> for PasswordReset {
    fn from(e: PasswordResetEntity) -> Self {
        PasswordReset {
            id: e.id,
            user_id: e.user_id,
            token_digest: e.token_digest,
            expires_at: e.expires_at,
            created_at: e.created_at,
        }
    }
}

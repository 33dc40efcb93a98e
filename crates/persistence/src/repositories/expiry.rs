//! Expiry reminder ledger.
//!
//! One row per (user, threshold, calendar day). The UNIQUE constraint plus
//! ON CONFLICT DO NOTHING makes the daily sweep idempotent: re-running the
//! sweep on the same day cannot notify a user twice for the same threshold.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ExpiryReminderRepository {
    pool: PgPool,
}

impl ExpiryReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records that a reminder was sent. Returns false when a matching row
    /// already exists, meaning the caller must skip the notification.
    pub async fn try_record(
        &self,
        user_id: Uuid,
        days_remaining: i32,
        sent_on: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("record_expiry_reminder");
        let result = sqlx::query(
            "INSERT INTO expiry_reminders (user_id, days_remaining, sent_on) \
             VALUES ($1, $2, $3) ON CONFLICT (user_id, days_remaining, sent_on) DO NOTHING",
        )
        .bind(user_id)
        .bind(days_remaining)
        .bind(sent_on)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

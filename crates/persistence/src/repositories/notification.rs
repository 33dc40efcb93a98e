//! Notification repository.

use domain::models::Notification;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        kind: &str,
        message: &str,
    ) -> Result<Notification, sqlx::Error> {
        let timer = QueryTimer::new("create_notification");
        let entity = sqlx::query_as::<_, NotificationEntity>(
            "INSERT INTO notifications (user_id, kind, message) VALUES ($1, $2, $3) \
             RETURNING id, user_id, kind, message, read, created_at",
        )
        .bind(user_id)
        .bind(kind)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(Notification::from)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications");
        let entities = sqlx::query_as::<_, NotificationEntity>(
            "SELECT id, user_id, kind, message, read, created_at \
             FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(Notification::from).collect())
    }

    /// Marks one of the user's notifications read. The owner check lives in
    /// the WHERE clause so users cannot touch other users' rows.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_read");
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_unread_notifications");
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }
}

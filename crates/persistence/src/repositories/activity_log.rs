//! User activity log repository. Append-only.

use domain::models::ActivityLog;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ActivityLogEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, user_id, action, details, ip_address, created_at";

#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        user_id: Uuid,
        action: &str,
        details: serde_json::Value,
        ip_address: Option<&str>,
    ) -> Result<ActivityLog, sqlx::Error> {
        let timer = QueryTimer::new("insert_activity_log");
        let entity = sqlx::query_as::<_, ActivityLogEntity>(&format!(
            "INSERT INTO activity_logs (user_id, action, details, ip_address) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        ))
        .bind(user_id)
        .bind(action)
        .bind(details)
        .bind(ip_address)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(ActivityLog::from)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let timer = QueryTimer::new("list_activity_logs_for_user");
        let entities = sqlx::query_as::<_, ActivityLogEntity>(&format!(
            "SELECT {} FROM activity_logs WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
            COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(ActivityLog::from).collect())
    }

    pub async fn list_all(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_activity_logs");
        let entities = sqlx::query_as::<_, ActivityLogEntity>(&format!(
            "SELECT {} FROM activity_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(ActivityLog::from).collect())
    }
}

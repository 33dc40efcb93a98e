//! Admin audit log repository. Append-only.

use domain::models::AuditLog;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AuditLogEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, admin_id, action, target_kind, target_id, details, created_at";

#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        admin_id: Uuid,
        action: &str,
        target_kind: &str,
        target_id: Option<Uuid>,
        details: serde_json::Value,
    ) -> Result<AuditLog, sqlx::Error> {
        let timer = QueryTimer::new("insert_audit_log");
        let entity = sqlx::query_as::<_, AuditLogEntity>(&format!(
            "INSERT INTO audit_logs (admin_id, action, target_kind, target_id, details) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        ))
        .bind(admin_id)
        .bind(action)
        .bind(target_kind)
        .bind(target_id)
        .bind(details)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(AuditLog::from)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<AuditLog>, sqlx::Error> {
        let timer = QueryTimer::new("list_audit_logs");
        let entities = sqlx::query_as::<_, AuditLogEntity>(&format!(
            "SELECT {} FROM audit_logs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(AuditLog::from).collect())
    }
}

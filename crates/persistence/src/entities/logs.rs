//! Activity and audit log entities.

use chrono::{DateTime, Utc};
use domain::models::{ActivityLog, AuditLog};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for user activity logs.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogEntity> for ActivityLog {
    fn from(e: ActivityLogEntity) -> Self {
        ActivityLog {
            id: e.id,
            user_id: e.user_id,
            action: e.action,
            details: e.details,
            ip_address: e.ip_address,
            created_at: e.created_at,
        }
    }
}

/// Database entity for admin audit logs.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub target_kind: String,
    pub target_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntity> for AuditLog {
    fn from(e: AuditLogEntity) -> Self {
        AuditLog {
            id: e.id,
            admin_id: e.admin_id,
            action: e.action,
            target_kind: e.target_kind,
            target_id: e.target_id,
            details: e.details,
            created_at: e.created_at,
        }
    }
}

//! Admin log routes and the shared audit trail helper.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{ActivityLog, AuditLog};
use persistence::repositories::{ActivityLogRepository, AuditLogRepository};

use crate::app::AppState;
use crate::error::ApiError;

const DEFAULT_PER_PAGE: i64 = 50;
const MAX_PER_PAGE: i64 = 500;

/// Appends an audit row for an admin action. Best-effort: the primary state
/// change has already committed, so a failed audit insert is logged, not
/// bubbled up.
pub(crate) async fn record_audit(
    pool: &PgPool,
    admin_id: Uuid,
    action: &str,
    target_kind: &str,
    target_id: Option<Uuid>,
    details: serde_json::Value,
) {
    let repo = AuditLogRepository::new(pool.clone());
    if let Err(e) = repo
        .insert(admin_id, action, target_kind, target_id, details)
        .await
    {
        tracing::warn!(
            admin_id = %admin_id,
            action = action,
            error = %e,
            "Failed to append audit log row"
        );
    }
}

/// Pagination query shared by the log listings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl LogQuery {
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1) * per_page)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogsResponse {
    pub audit_logs: Vec<AuditLog>,
}

/// GET /admin/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<AuditLogsResponse>, ApiError> {
    let (limit, offset) = query.limit_offset();
    let audit_logs = AuditLogRepository::new(state.pool.clone())
        .list(limit, offset)
        .await?;
    Ok(Json(AuditLogsResponse { audit_logs }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogsResponse {
    pub activity_logs: Vec<ActivityLog>,
}

/// GET /admin/activity-logs
pub async fn list_activity_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<ActivityLogsResponse>, ApiError> {
    let (limit, offset) = query.limit_offset();
    let activity_logs = ActivityLogRepository::new(state.pool.clone())
        .list_all(limit, offset)
        .await?;
    Ok(Json(ActivityLogsResponse { activity_logs }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_offset_defaults() {
        let query = LogQuery {
            page: None,
            per_page: None,
        };
        assert_eq!(query.limit_offset(), (50, 0));
    }

    #[test]
    fn test_limit_offset_clamps() {
        let query = LogQuery {
            page: Some(0),
            per_page: Some(10_000),
        };
        assert_eq!(query.limit_offset(), (500, 0));

        let query = LogQuery {
            page: Some(3),
            per_page: Some(20),
        };
        assert_eq!(query.limit_offset(), (20, 40));
    }
}

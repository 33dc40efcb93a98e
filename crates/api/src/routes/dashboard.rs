//! User dashboard routes: profile, notifications, activity history.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use domain::models::{ActivityLog, Notification, ServiceStatus, User};
use persistence::repositories::{
    ActivityLogRepository, NotificationRepository, ServiceStatusRepository, UserRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

const NOTIFICATION_LIMIT: i64 = 100;
const ACTIVITY_LIMIT: i64 = 100;

/// Dashboard payload. The password hash never serializes off the user model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: User,
    pub days_remaining: i64,
    pub service_status: Option<ServiceStatus>,
    pub unread_notifications: i64,
}

/// GET /user/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let service_status = ServiceStatusRepository::new(state.pool.clone())
        .current()
        .await?;
    let unread = NotificationRepository::new(state.pool.clone())
        .unread_count(auth.user_id)
        .await?;

    let days_remaining = user.days_remaining(Utc::now());
    Ok(Json(DashboardResponse {
        user,
        days_remaining,
        service_status,
        unread_notifications: unread,
    }))
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// GET /user/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let notifications = NotificationRepository::new(state.pool.clone())
        .list_for_user(auth.user_id, NOTIFICATION_LIMIT)
        .await?;
    Ok(Json(NotificationsResponse { notifications }))
}

/// POST /user/notifications/:id/read
///
/// Owner-scoped: marking another user's notification answers 404.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = NotificationRepository::new(state.pool.clone())
        .mark_read(id, auth.user_id)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "read": true })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogsResponse {
    pub activity_logs: Vec<ActivityLog>,
}

/// GET /user/activity-logs
pub async fn list_activity_logs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ActivityLogsResponse>, ApiError> {
    let activity_logs = ActivityLogRepository::new(state.pool.clone())
        .list_for_user(auth.user_id, ACTIVITY_LIMIT)
        .await?;
    Ok(Json(ActivityLogsResponse { activity_logs }))
}

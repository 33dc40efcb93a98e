//! Notification entity.

use chrono::{DateTime, Utc};
use domain::models::{Notification, NotificationKind};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for Notification {
    fn from(e: NotificationEntity) -> Self {
        Notification {
            id: e.id,
            user_id: e.user_id,
            kind: NotificationKind::from_str(&e.kind).unwrap_or(NotificationKind::Info),
            message: e.message,
            read: e.read,
            created_at: e.created_at,
        }
    }
}

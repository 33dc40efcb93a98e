//! Service status entity.

use chrono::{DateTime, Utc};
use domain::models::{ServiceState, ServiceStatus};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ServiceStatusEntity {
    pub id: Uuid,
    pub state: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<ServiceStatusEntity> for ServiceStatus {
    fn from(e: ServiceStatusEntity) -> Self {
        ServiceStatus {
            id: e.id,
            state: ServiceState::from_str(&e.state).unwrap_or(ServiceState::Operational),
            message: e.message,
            created_at: e.created_at,
        }
    }
}

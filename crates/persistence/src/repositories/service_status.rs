//! Service status repository. Status rows are append-only.

use domain::models::ServiceStatus;
use sqlx::PgPool;

use crate::entities::ServiceStatusEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct ServiceStatusRepository {
    pool: PgPool,
}

impl ServiceStatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, state: &str, message: &str) -> Result<ServiceStatus, sqlx::Error> {
        let timer = QueryTimer::new("append_service_status");
        let entity = sqlx::query_as::<_, ServiceStatusEntity>(
            "INSERT INTO service_status (state, message) VALUES ($1, $2) \
             RETURNING id, state, message, created_at",
        )
        .bind(state)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(ServiceStatus::from)
    }

    /// The most recent announcement, if any.
    pub async fn current(&self) -> Result<Option<ServiceStatus>, sqlx::Error> {
        let timer = QueryTimer::new("current_service_status");
        let entity = sqlx::query_as::<_, ServiceStatusEntity>(
            "SELECT id, state, message, created_at FROM service_status \
             ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(ServiceStatus::from))
    }

    pub async fn history(&self, limit: i64) -> Result<Vec<ServiceStatus>, sqlx::Error> {
        let timer = QueryTimer::new("service_status_history");
        let entities = sqlx::query_as::<_, ServiceStatusEntity>(
            "SELECT id, state, message, created_at FROM service_status \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(ServiceStatus::from).collect())
    }
}

//! Health probe.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: u64,
}

/// GET /health. Reports "degraded" rather than failing when the database
/// is unreachable, so load balancers can still read the body.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = probe_database(&state).await;

    // Health checks double as the pool gauge sampling point.
    persistence::metrics::record_pool_metrics(&state.pool);

    Json(HealthResponse {
        status: if database.connected {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

async fn probe_database(state: &AppState) -> DatabaseHealth {
    let started = std::time::Instant::now();
    let connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    DatabaseHealth {
        connected,
        latency_ms: started.elapsed().as_millis() as u64,
    }
}

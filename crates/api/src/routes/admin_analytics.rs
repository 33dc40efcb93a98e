//! Admin analytics route.

use axum::{extract::State, Json};

use domain::models::AnalyticsSummary;
use persistence::repositories::AnalyticsRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /admin/analytics
pub async fn get_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let summary = AnalyticsRepository::new(state.pool.clone()).summary().await?;
    Ok(Json(summary))
}

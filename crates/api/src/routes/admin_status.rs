//! Admin service status routes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use domain::models::{NotificationKind, ServiceState, ServiceStatus};
use persistence::repositories::{ServiceStatusRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::record_audit;
use crate::services::dispatch::{user_template_data, DispatchOptions};

const HISTORY_LIMIT: i64 = 50;
const BROADCAST_PAGE: i64 = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub current: Option<ServiceStatus>,
    pub history: Vec<ServiceStatus>,
}

/// GET /admin/service-status
pub async fn get_status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let repo = ServiceStatusRepository::new(state.pool.clone());
    let history = repo.history(HISTORY_LIMIT).await?;
    let current = history.first().cloned();
    Ok(Json(StatusResponse { current, history }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceRequest {
    pub status: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    #[serde(default)]
    pub send_email: bool,
}

/// POST /admin/service-status
///
/// Appends the announcement, writes one notification per user and, when
/// sendEmail is set, emails everyone with the service_announcement
/// template. The broadcast is sequential best-effort: one failing
/// recipient never stops the rest.
pub async fn announce_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<AnnounceRequest>,
) -> Result<(StatusCode, Json<ServiceStatus>), ApiError> {
    request.validate()?;
    let status = ServiceState::from_str(&request.status)
        .map_err(|_| ApiError::Validation(format!("Invalid status: {}", request.status)))?;

    let announcement = ServiceStatusRepository::new(state.pool.clone())
        .append(status.as_str(), &request.message)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "announce_status",
        "service_status",
        Some(announcement.id),
        serde_json::json!({ "status": status.as_str(), "sendEmail": request.send_email }),
    )
    .await;

    let users = UserRepository::new(state.pool.clone());
    let mut offset = 0;
    let mut notified = 0usize;
    loop {
        let page = match users.list(None, BROADCAST_PAGE, offset).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "Status broadcast aborted while paging users");
                break;
            }
        };
        if page.is_empty() {
            break;
        }
        offset += page.len() as i64;

        for user in &page {
            let mut data = user_template_data(user);
            data.insert("status".to_string(), status.as_str().to_string());
            data.insert("status_message".to_string(), request.message.clone());

            let mut options = DispatchOptions::notify(
                NotificationKind::ServiceStatus,
                format!("Service status: {}. {}", status, request.message),
            );
            if request.send_email {
                options = options.with_email();
            }
            state
                .dispatcher
                .dispatch(user, "service_announcement", data, options)
                .await;
            notified += 1;
        }
    }

    tracing::info!(
        status = status.as_str(),
        notified,
        emailed = request.send_email,
        "Service status announced"
    );

    Ok((StatusCode::CREATED, Json(announcement)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announce_request_parses_defaults() {
        let request: AnnounceRequest = serde_json::from_value(serde_json::json!({
            "status": "maintenance",
            "message": "Planned window tonight."
        }))
        .unwrap();
        assert!(!request.send_email);
        assert!(request.validate().is_ok());
        assert!(ServiceState::from_str(&request.status).is_ok());
    }
}

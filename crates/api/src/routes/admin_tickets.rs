//! Admin ticket management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use domain::models::{NotificationKind, Ticket, TicketReply, TicketStatus};
use persistence::repositories::{TicketRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::{record_audit, LogQuery};
use crate::services::dispatch::{user_template_data, DispatchOptions};

#[derive(Debug, Serialize)]
pub struct TicketsResponse {
    pub tickets: Vec<Ticket>,
}

/// GET /admin/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<TicketsResponse>, ApiError> {
    let (limit, offset) = query.limit_offset();
    let tickets = TicketRepository::new(state.pool.clone())
        .list_all(limit, offset)
        .await?;
    Ok(Json(TicketsResponse { tickets }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminReplyRequest {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// POST /admin/tickets/:id/reply
///
/// The reply commits first; the notification email to the ticket owner is
/// best-effort and never rolls the reply back.
pub async fn reply_to_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AdminReplyRequest>,
) -> Result<(StatusCode, Json<TicketReply>), ApiError> {
    request.validate()?;

    let tickets = TicketRepository::new(state.pool.clone());
    let ticket = tickets
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    let reply = tickets
        .add_reply(id, auth.user_id, true, &request.message)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "reply_ticket",
        "ticket",
        Some(id),
        serde_json::json!({ "subject": ticket.subject }),
    )
    .await;

    match UserRepository::new(state.pool.clone())
        .find_by_id(ticket.user_id)
        .await
    {
        Ok(Some(owner)) => {
            let mut data = user_template_data(&owner);
            data.insert("ticket_subject".to_string(), ticket.subject.clone());
            data.insert("reply_message".to_string(), request.message.clone());
            state
                .dispatcher
                .dispatch(
                    &owner,
                    "ticket_reply",
                    data,
                    DispatchOptions::notify(
                        NotificationKind::TicketReply,
                        format!("Support replied to \"{}\".", ticket.subject),
                    )
                    .with_email(),
                )
                .await;
        }
        Ok(None) => {
            tracing::warn!(ticket_id = %id, "Ticket owner no longer exists, skipping notice");
        }
        Err(e) => {
            tracing::error!(ticket_id = %id, error = %e, "Failed to load ticket owner");
        }
    }

    Ok((StatusCode::CREATED, Json(reply)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: String,
}

/// PUT /admin/tickets/:id/status
pub async fn set_ticket_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = TicketStatus::from_str(&request.status)
        .map_err(|_| ApiError::Validation(format!("Invalid ticket status: {}", request.status)))?;

    let updated = TicketRepository::new(state.pool.clone())
        .set_status(id, status.as_str())
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Ticket not found".to_string()));
    }

    record_audit(
        &state.pool,
        auth.user_id,
        "set_ticket_status",
        "ticket",
        Some(id),
        serde_json::json!({ "status": status.as_str() }),
    )
    .await;

    Ok(Json(serde_json::json!({ "status": status.as_str() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_reply_requires_message() {
        assert!(AdminReplyRequest {
            message: "".to_string()
        }
        .validate()
        .is_err());
    }
}

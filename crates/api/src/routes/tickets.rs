//! Support ticket routes for end users.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::{Ticket, TicketReply};
use persistence::repositories::{ActivityLogRepository, TicketRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::auth::forwarded_ip;

#[derive(Debug, Serialize)]
pub struct TicketsResponse {
    pub tickets: Vec<Ticket>,
}

/// GET /user/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TicketsResponse>, ApiError> {
    let tickets = TicketRepository::new(state.pool.clone())
        .list_for_user(auth.user_id)
        .await?;
    Ok(Json(TicketsResponse { tickets }))
}

/// Request body for opening a ticket.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// POST /user/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    request.validate()?;

    let ticket = TicketRepository::new(state.pool.clone())
        .create(auth.user_id, &request.subject, &request.description)
        .await?;

    let logs = ActivityLogRepository::new(state.pool.clone());
    if let Err(e) = logs
        .insert(
            auth.user_id,
            "create_ticket",
            serde_json::json!({ "ticketId": ticket.id, "subject": ticket.subject }),
            forwarded_ip(&headers).as_deref(),
        )
        .await
    {
        tracing::warn!(user_id = %auth.user_id, error = %e, "Failed to record ticket activity");
    }

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Request body for replying to a ticket.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// POST /user/tickets/:id/reply
///
/// Owner-scoped: replying to another user's ticket answers 404. A user
/// reply reopens an answered ticket.
pub async fn reply_to_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<TicketReply>), ApiError> {
    request.validate()?;

    let tickets = TicketRepository::new(state.pool.clone());
    let ticket = tickets
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;
    if ticket.user_id != auth.user_id {
        return Err(ApiError::NotFound("Ticket not found".to_string()));
    }

    let reply = tickets
        .add_reply(id, auth.user_id, false, &request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ticket_validation() {
        let request = CreateTicketRequest {
            subject: "Stream keeps buffering".to_string(),
            description: "Every evening after 8pm.".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = CreateTicketRequest {
            subject: "".to_string(),
            description: "body".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_reply_requires_message() {
        assert!(ReplyRequest {
            message: "".to_string()
        }
        .validate()
        .is_err());
    }
}

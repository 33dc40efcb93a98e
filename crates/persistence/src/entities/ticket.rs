//! Ticket entities.

use chrono::{DateTime, Utc};
use domain::models::{Ticket, TicketReply, TicketStatus};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TicketEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TicketEntity> for Ticket {
    fn from(e: TicketEntity) -> Self {
        Ticket {
            id: e.id,
            user_id: e.user_id,
            subject: e.subject,
            message: e.message,
            status: TicketStatus::from_str(&e.status).unwrap_or(TicketStatus::Open),
            replies: Vec::new(),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TicketReplyEntity {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub from_admin: bool,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<TicketReplyEntity> for TicketReply {
    fn from(e: TicketReplyEntity) -> Self {
        TicketReply {
            id: e.id,
            ticket_id: e.ticket_id,
            author_id: e.author_id,
            from_admin: e.from_admin,
            message: e.message,
            created_at: e.created_at,
        }
    }
}

//! Ticket repository.

use domain::models::{Ticket, TicketReply};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TicketEntity, TicketReplyEntity};
use crate::metrics::QueryTimer;

const TICKET_COLUMNS: &str = "id, user_id, subject, message, status, created_at, updated_at";
const REPLY_COLUMNS: &str = "id, ticket_id, author_id, from_admin, message, created_at";

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> Result<Ticket, sqlx::Error> {
        let timer = QueryTimer::new("create_ticket");
        let entity = sqlx::query_as::<_, TicketEntity>(&format!(
            "INSERT INTO tickets (user_id, subject, message) VALUES ($1, $2, $3) \
             RETURNING {}",
            TICKET_COLUMNS
        ))
        .bind(user_id)
        .bind(subject)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(Ticket::from)
    }

    /// Fetches a ticket with its replies attached, oldest reply first.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, sqlx::Error> {
        let timer = QueryTimer::new("find_ticket_by_id");
        let entity = sqlx::query_as::<_, TicketEntity>(&format!(
            "SELECT {} FROM tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(entity) = entity else {
            timer.record();
            return Ok(None);
        };

        let replies = sqlx::query_as::<_, TicketReplyEntity>(&format!(
            "SELECT {} FROM ticket_replies WHERE ticket_id = $1 ORDER BY created_at",
            REPLY_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        let mut ticket = Ticket::from(entity);
        ticket.replies = replies.into_iter().map(TicketReply::from).collect();
        Ok(Some(ticket))
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Ticket>, sqlx::Error> {
        let timer = QueryTimer::new("list_tickets_for_user");
        let entities = sqlx::query_as::<_, TicketEntity>(&format!(
            "SELECT {} FROM tickets WHERE user_id = $1 ORDER BY created_at DESC",
            TICKET_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(Ticket::from).collect())
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Ticket>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_tickets");
        let entities = sqlx::query_as::<_, TicketEntity>(&format!(
            "SELECT {} FROM tickets ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            TICKET_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(Ticket::from).collect())
    }

    /// Appends a reply and flips the ticket status in one transaction.
    /// Admin replies mark the ticket answered, user replies reopen it.
    pub async fn add_reply(
        &self,
        ticket_id: Uuid,
        author_id: Uuid,
        from_admin: bool,
        message: &str,
    ) -> Result<TicketReply, sqlx::Error> {
        let timer = QueryTimer::new("add_ticket_reply");
        let mut tx = self.pool.begin().await?;

        let entity = sqlx::query_as::<_, TicketReplyEntity>(&format!(
            "INSERT INTO ticket_replies (ticket_id, author_id, from_admin, message) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            REPLY_COLUMNS
        ))
        .bind(ticket_id)
        .bind(author_id)
        .bind(from_admin)
        .bind(message)
        .fetch_one(&mut *tx)
        .await?;

        let status = if from_admin { "answered" } else { "open" };
        sqlx::query("UPDATE tickets SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(ticket_id)
            .bind(status)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(TicketReply::from(entity))
    }

    pub async fn set_status(&self, id: Uuid, status: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_ticket_status");
        let result =
            sqlx::query("UPDATE tickets SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

//! Email template entity.

use chrono::{DateTime, Utc};
use domain::models::EmailTemplate;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct EmailTemplateEntity {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EmailTemplateEntity> for EmailTemplate {
    fn from(e: EmailTemplateEntity) -> Self {
        EmailTemplate {
            id: e.id,
            name: e.name,
            subject: e.subject,
            body: e.body,
            version: e.version,
            created_at: e.created_at,
        }
    }
}

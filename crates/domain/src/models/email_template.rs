use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A versioned email template. Templates are append-only: editing a template
/// inserts a new row with the next version number, and senders always pick
/// the highest version for a given name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    /// Markup body with `{placeholder}` slots, compiled to HTML at send time.
    pub body: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

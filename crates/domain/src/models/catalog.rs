//! Admin-managed catalog models: the add-on service offerings users can
//! subscribe to, per-page titles shown in the frontend chrome, and setup
//! tutorials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An add-on service offered in the catalog. Distinct from the per-user
/// `custom_services` JSON, which records which offerings a user enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable title for a frontend page, keyed by page path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTitle {
    pub id: Uuid,
    pub page: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// A setup tutorial; `content` holds the ordered steps as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: Uuid,
    pub title: String,
    pub content: serde_json::Value,
    pub for_role: String,
    pub created_at: DateTime<Utc>,
}

//! Catalog entities (service offerings, page titles, tutorials).

use chrono::{DateTime, Utc};
use domain::models::{PageTitle, ServiceOffering, Tutorial};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct ServiceOfferingEntity {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceOfferingEntity> for ServiceOffering {
    fn from(e: ServiceOfferingEntity) -> Self {
        ServiceOffering {
            id: e.id,
            name: e.name,
            description: e.description,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PageTitleEntity {
    pub id: Uuid,
    pub page: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

impl From<PageTitleEntity> for PageTitle {
    fn from(e: PageTitleEntity) -> Self {
        PageTitle {
            id: e.id,
            page: e.page,
            title: e.title,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TutorialEntity {
    pub id: Uuid,
    pub title: String,
    pub content: serde_json::Value,
    pub for_role: String,
    pub created_at: DateTime<Utc>,
}

impl From<TutorialEntity> for Tutorial {
    fn from(e: TutorialEntity) -> Self {
        Tutorial {
            id: e.id,
            title: e.title,
            content: e.content,
            for_role: e.for_role,
            created_at: e.created_at,
        }
    }
}

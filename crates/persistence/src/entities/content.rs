//! Portal content entities (news posts, footer).

use chrono::{DateTime, Utc};
use domain::models::{Footer, NewsItem};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct NewsEntity {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NewsEntity> for NewsItem {
    fn from(e: NewsEntity) -> Self {
        NewsItem {
            id: e.id,
            title: e.title,
            body: e.body,
            published: e.published,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct FooterEntity {
    pub id: i32,
    pub text: String,
    pub links: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl From<FooterEntity> for Footer {
    fn from(e: FooterEntity) -> Self {
        Footer {
            text: e.text,
            links: e.links,
            updated_at: e.updated_at,
        }
    }
}

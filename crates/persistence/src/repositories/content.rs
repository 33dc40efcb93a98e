//! Portal content repository (news posts, footer).

use domain::models::{Footer, NewsItem};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{FooterEntity, NewsEntity};
use crate::metrics::QueryTimer;

const NEWS_COLUMNS: &str = "id, title, body, published, created_at, updated_at";

#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_news(&self, published_only: bool) -> Result<Vec<NewsItem>, sqlx::Error> {
        let timer = QueryTimer::new("list_news");
        let entities = sqlx::query_as::<_, NewsEntity>(&format!(
            "SELECT {} FROM news WHERE published OR NOT $1 ORDER BY created_at DESC",
            NEWS_COLUMNS
        ))
        .bind(published_only)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(NewsItem::from).collect())
    }

    pub async fn create_news(
        &self,
        title: &str,
        body: &str,
        published: bool,
    ) -> Result<NewsItem, sqlx::Error> {
        let timer = QueryTimer::new("create_news");
        let entity = sqlx::query_as::<_, NewsEntity>(&format!(
            "INSERT INTO news (title, body, published) VALUES ($1, $2, $3) RETURNING {}",
            NEWS_COLUMNS
        ))
        .bind(title)
        .bind(body)
        .bind(published)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(NewsItem::from)
    }

    pub async fn update_news(
        &self,
        id: Uuid,
        title: &str,
        body: &str,
        published: bool,
    ) -> Result<Option<NewsItem>, sqlx::Error> {
        let timer = QueryTimer::new("update_news");
        let entity = sqlx::query_as::<_, NewsEntity>(&format!(
            "UPDATE news SET title = $2, body = $3, published = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            NEWS_COLUMNS
        ))
        .bind(id)
        .bind(title)
        .bind(body)
        .bind(published)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(NewsItem::from))
    }

    pub async fn delete_news(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_news");
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn get_footer(&self) -> Result<Option<Footer>, sqlx::Error> {
        let timer = QueryTimer::new("get_footer");
        let entity = sqlx::query_as::<_, FooterEntity>(
            "SELECT id, text, links, updated_at FROM footer WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(Footer::from))
    }

    pub async fn upsert_footer(
        &self,
        text: &str,
        links: &serde_json::Value,
    ) -> Result<Footer, sqlx::Error> {
        let timer = QueryTimer::new("upsert_footer");
        let entity = sqlx::query_as::<_, FooterEntity>(
            "INSERT INTO footer (id, text, links) VALUES (1, $1, $2) \
             ON CONFLICT (id) DO UPDATE SET \
             text = EXCLUDED.text, links = EXCLUDED.links, updated_at = NOW() \
             RETURNING id, text, links, updated_at",
        )
        .bind(text)
        .bind(links)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(Footer::from)
    }
}

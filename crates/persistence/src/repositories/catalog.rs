//! Catalog repository (service offerings, page titles, tutorials).

use domain::models::{PageTitle, ServiceOffering, Tutorial};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PageTitleEntity, ServiceOfferingEntity, TutorialEntity};
use crate::metrics::QueryTimer;

const OFFERING_COLUMNS: &str = "id, name, description, created_at, updated_at";
const TUTORIAL_COLUMNS: &str = "id, title, content, for_role, created_at";

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_offerings(&self) -> Result<Vec<ServiceOffering>, sqlx::Error> {
        let timer = QueryTimer::new("list_service_offerings");
        let entities = sqlx::query_as::<_, ServiceOfferingEntity>(&format!(
            "SELECT {} FROM custom_services ORDER BY name",
            OFFERING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(ServiceOffering::from).collect())
    }

    pub async fn create_offering(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ServiceOffering, sqlx::Error> {
        let timer = QueryTimer::new("create_service_offering");
        let entity = sqlx::query_as::<_, ServiceOfferingEntity>(&format!(
            "INSERT INTO custom_services (name, description) VALUES ($1, $2) RETURNING {}",
            OFFERING_COLUMNS
        ))
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(ServiceOffering::from)
    }

    pub async fn update_offering(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<Option<ServiceOffering>, sqlx::Error> {
        let timer = QueryTimer::new("update_service_offering");
        let entity = sqlx::query_as::<_, ServiceOfferingEntity>(&format!(
            "UPDATE custom_services SET name = $2, description = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            OFFERING_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(ServiceOffering::from))
    }

    pub async fn list_page_titles(&self) -> Result<Vec<PageTitle>, sqlx::Error> {
        let timer = QueryTimer::new("list_page_titles");
        let entities = sqlx::query_as::<_, PageTitleEntity>(
            "SELECT id, page, title, updated_at FROM page_titles ORDER BY page",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(PageTitle::from).collect())
    }

    pub async fn update_page_title(
        &self,
        id: Uuid,
        title: &str,
    ) -> Result<Option<PageTitle>, sqlx::Error> {
        let timer = QueryTimer::new("update_page_title");
        let entity = sqlx::query_as::<_, PageTitleEntity>(
            "UPDATE page_titles SET title = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING id, page, title, updated_at",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(PageTitle::from))
    }

    pub async fn list_tutorials(&self) -> Result<Vec<Tutorial>, sqlx::Error> {
        let timer = QueryTimer::new("list_tutorials");
        let entities = sqlx::query_as::<_, TutorialEntity>(&format!(
            "SELECT {} FROM tutorials ORDER BY created_at DESC",
            TUTORIAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(Tutorial::from).collect())
    }

    pub async fn create_tutorial(
        &self,
        title: &str,
        content: &serde_json::Value,
        for_role: &str,
    ) -> Result<Tutorial, sqlx::Error> {
        let timer = QueryTimer::new("create_tutorial");
        let entity = sqlx::query_as::<_, TutorialEntity>(&format!(
            "INSERT INTO tutorials (title, content, for_role) \
             VALUES ($1, $2, $3) RETURNING {}",
            TUTORIAL_COLUMNS
        ))
        .bind(title)
        .bind(content)
        .bind(for_role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(Tutorial::from)
    }
}

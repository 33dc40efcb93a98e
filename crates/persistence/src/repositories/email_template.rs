//! Email template repository.
//!
//! Templates form an append-only version chain per name. Edits insert a new
//! row with the next version number; prior versions stay retrievable and are
//! never mutated.

use domain::models::EmailTemplate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EmailTemplateEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct EmailTemplateRepository {
    pool: PgPool,
}

impl EmailTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolves the current (highest-version) template for a name.
    pub async fn latest_by_name(&self, name: &str) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let timer = QueryTimer::new("latest_template_by_name");
        let entity = sqlx::query_as::<_, EmailTemplateEntity>(
            "SELECT id, name, subject, body, version, created_at \
             FROM email_templates WHERE name = $1 \
             ORDER BY version DESC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(EmailTemplate::from))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let timer = QueryTimer::new("find_template_by_id");
        let entity = sqlx::query_as::<_, EmailTemplateEntity>(
            "SELECT id, name, subject, body, version, created_at \
             FROM email_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(EmailTemplate::from))
    }

    /// Lists the current version of every template name.
    pub async fn list_latest(&self) -> Result<Vec<EmailTemplate>, sqlx::Error> {
        let timer = QueryTimer::new("list_latest_templates");
        let entities = sqlx::query_as::<_, EmailTemplateEntity>(
            "SELECT DISTINCT ON (name) id, name, subject, body, version, created_at \
             FROM email_templates ORDER BY name, version DESC",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(EmailTemplate::from).collect())
    }

    /// All versions of a named template, oldest first.
    pub async fn list_versions(&self, name: &str) -> Result<Vec<EmailTemplate>, sqlx::Error> {
        let timer = QueryTimer::new("list_template_versions");
        let entities = sqlx::query_as::<_, EmailTemplateEntity>(
            "SELECT id, name, subject, body, version, created_at \
             FROM email_templates WHERE name = $1 ORDER BY version",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(EmailTemplate::from).collect())
    }

    /// Appends the next version for a name. Creates version 1 when the name
    /// is new. The nested select and the UNIQUE(name, version) constraint
    /// keep concurrent appends from ever overwriting a version.
    pub async fn append_version(
        &self,
        name: &str,
        subject: &str,
        body: &str,
    ) -> Result<EmailTemplate, sqlx::Error> {
        let timer = QueryTimer::new("append_template_version");
        let entity = sqlx::query_as::<_, EmailTemplateEntity>(
            "INSERT INTO email_templates (name, subject, body, version) \
             VALUES ($1, $2, $3, \
                 (SELECT COALESCE(MAX(version), 0) + 1 FROM email_templates WHERE name = $1)) \
             RETURNING id, name, subject, body, version, created_at",
        )
        .bind(name)
        .bind(subject)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(EmailTemplate::from)
    }
}

//! Branding repository (singleton row, upserted).

use domain::models::Branding;
use sqlx::PgPool;

use crate::entities::BrandingEntity;
use crate::metrics::QueryTimer;

#[derive(Debug, Clone)]
pub struct BrandingInput {
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: String,
    pub portal_name: String,
}

#[derive(Clone)]
pub struct BrandingRepository {
    pool: PgPool,
}

impl BrandingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current branding, falling back to defaults when no row exists yet.
    pub async fn get(&self) -> Result<Branding, sqlx::Error> {
        let timer = QueryTimer::new("get_branding");
        let entity = sqlx::query_as::<_, BrandingEntity>(
            "SELECT id, primary_color, secondary_color, logo_url, portal_name, updated_at \
             FROM branding WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(Branding::from).unwrap_or_default())
    }

    pub async fn upsert(&self, input: BrandingInput) -> Result<Branding, sqlx::Error> {
        let timer = QueryTimer::new("upsert_branding");
        let entity = sqlx::query_as::<_, BrandingEntity>(
            "INSERT INTO branding (id, primary_color, secondary_color, logo_url, portal_name) \
             VALUES (1, $1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
             primary_color = EXCLUDED.primary_color, \
             secondary_color = EXCLUDED.secondary_color, \
             logo_url = EXCLUDED.logo_url, \
             portal_name = EXCLUDED.portal_name, \
             updated_at = NOW() \
             RETURNING id, primary_color, secondary_color, logo_url, portal_name, updated_at",
        )
        .bind(&input.primary_color)
        .bind(&input.secondary_color)
        .bind(&input.logo_url)
        .bind(&input.portal_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(Branding::from)
    }
}

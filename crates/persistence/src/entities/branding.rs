//! Branding entity (singleton row).

use chrono::{DateTime, Utc};
use domain::models::Branding;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct BrandingEntity {
    pub id: i32,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: String,
    pub portal_name: String,
    pub updated_at: DateTime<Utc>,
}

impl From<BrandingEntity> for Branding {
    fn from(e: BrandingEntity) -> Self {
        Branding {
            primary_color: e.primary_color,
            secondary_color: e.secondary_color,
            logo_url: e.logo_url,
            portal_name: e.portal_name,
            updated_at: e.updated_at,
        }
    }
}

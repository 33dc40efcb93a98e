//! Price entity.

use chrono::{DateTime, Utc};
use domain::models::{Price, PriceKind};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PriceEntity {
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub amount_cents: i64,
    pub currency: String,
    pub duration_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PriceEntity> for Price {
    fn from(e: PriceEntity) -> Self {
        Price {
            id: e.id,
            name: e.name,
            kind: PriceKind::from_str(&e.kind).unwrap_or(PriceKind::Subscription),
            amount_cents: e.amount_cents,
            currency: e.currency,
            duration_days: e.duration_days,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

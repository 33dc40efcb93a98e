//! Price repository.

use domain::models::Price;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PriceEntity;
use crate::metrics::QueryTimer;

const PRICE_COLUMNS: &str =
    "id, name, kind, amount_cents, currency, duration_days, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PriceInput {
    pub name: String,
    pub kind: String,
    pub amount_cents: i64,
    pub currency: String,
    pub duration_days: Option<i32>,
}

#[derive(Clone)]
pub struct PriceRepository {
    pool: PgPool,
}

impl PriceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Price>, sqlx::Error> {
        let timer = QueryTimer::new("list_prices");
        let entities = sqlx::query_as::<_, PriceEntity>(&format!(
            "SELECT {} FROM prices ORDER BY kind, amount_cents",
            PRICE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(entities?.into_iter().map(Price::from).collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Price>, sqlx::Error> {
        let timer = QueryTimer::new("find_price_by_id");
        let entity = sqlx::query_as::<_, PriceEntity>(&format!(
            "SELECT {} FROM prices WHERE id = $1",
            PRICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(Price::from))
    }

    pub async fn create(&self, input: PriceInput) -> Result<Price, sqlx::Error> {
        let timer = QueryTimer::new("create_price");
        let entity = sqlx::query_as::<_, PriceEntity>(&format!(
            "INSERT INTO prices (name, kind, amount_cents, currency, duration_days) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PRICE_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.kind)
        .bind(input.amount_cents)
        .bind(&input.currency)
        .bind(input.duration_days)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity.map(Price::from)
    }

    pub async fn update(&self, id: Uuid, input: PriceInput) -> Result<Option<Price>, sqlx::Error> {
        let timer = QueryTimer::new("update_price");
        let entity = sqlx::query_as::<_, PriceEntity>(&format!(
            "UPDATE prices SET name = $2, kind = $3, amount_cents = $4, currency = $5, \
             duration_days = $6, updated_at = NOW() WHERE id = $1 RETURNING {}",
            PRICE_COLUMNS
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.kind)
        .bind(input.amount_cents)
        .bind(&input.currency)
        .bind(input.duration_days)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(entity?.map(Price::from))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_price");
        let result = sqlx::query("DELETE FROM prices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Adjusts the listed prices (or all prices when `ids` is None) by a
    /// percentage, rounding to the nearest cent and clamping at zero.
    /// Returns the number of rows touched.
    pub async fn adjust_by_percent(
        &self,
        ids: Option<&[Uuid]>,
        percent: f64,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("adjust_prices_percent");
        let result = sqlx::query(
            "UPDATE prices SET \
             amount_cents = GREATEST(0, ROUND(amount_cents * (1 + $1 / 100.0))::bigint), \
             updated_at = NOW() \
             WHERE $2::uuid[] IS NULL OR id = ANY($2)",
        )
        .bind(percent)
        .bind(ids)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Adds a fixed amount of cents to the listed prices (or all prices
    /// when `ids` is None), clamping at zero.
    pub async fn adjust_by_fixed(
        &self,
        ids: Option<&[Uuid]>,
        delta_cents: i64,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("adjust_prices_fixed");
        let result = sqlx::query(
            "UPDATE prices SET amount_cents = GREATEST(0, amount_cents + $1), \
             updated_at = NOW() \
             WHERE $2::uuid[] IS NULL OR id = ANY($2)",
        )
        .bind(delta_cents)
        .bind(ids)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}

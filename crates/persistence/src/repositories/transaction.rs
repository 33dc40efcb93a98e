//! Transaction repository (payment records).

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TransactionEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, user_id, amount_cents, currency, status, created_at";

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        currency: &str,
        status: &str,
    ) -> Result<TransactionEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_transaction");
        let entity = sqlx::query_as::<_, TransactionEntity>(&format!(
            "INSERT INTO transactions (user_id, amount_cents, currency, status) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        ))
        .bind(user_id)
        .bind(amount_cents)
        .bind(currency)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        entity
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TransactionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_transactions_for_user");
        let entities = sqlx::query_as::<_, TransactionEntity>(&format!(
            "SELECT {} FROM transactions WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
            COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        entities
    }
}

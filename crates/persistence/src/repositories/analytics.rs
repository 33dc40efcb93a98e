//! Analytics aggregation queries for the admin panel.

use domain::models::AnalyticsSummary;
use sqlx::PgPool;

use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Computes the admin dashboard summary in a single round trip.
    ///
    /// Trial conversion counts trial users whose payment status reached
    /// "paid" against all users who ever held trial status.
    pub async fn summary(&self) -> Result<AnalyticsSummary, sqlx::Error> {
        let timer = QueryTimer::new("analytics_summary");
        let row: (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT \
             (SELECT COUNT(*) FROM users WHERE created_at >= NOW() - INTERVAL '30 days'), \
             (SELECT COUNT(*) FROM users WHERE subscription_expiration > NOW()), \
             (SELECT COUNT(*) FROM users WHERE subscription_expiration IS NOT NULL \
                  AND subscription_expiration <= NOW()), \
             (SELECT COALESCE(SUM(amount_cents), 0) FROM transactions \
                  WHERE status = 'completed'), \
             (SELECT COUNT(*) FROM users WHERE trial_status = TRUE), \
             (SELECT COUNT(*) FROM users WHERE trial_status = TRUE \
                  AND payment_status = 'paid')",
        )
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        let (new_users, active, expired, revenue, trials, converted) = row;
        let trial_conversion_rate = if trials > 0 {
            converted as f64 / trials as f64
        } else {
            0.0
        };

        Ok(AnalyticsSummary {
            new_users,
            active_subscriptions: active,
            expired_subscriptions: expired,
            revenue_cents: revenue,
            trial_conversion_rate,
        })
    }
}

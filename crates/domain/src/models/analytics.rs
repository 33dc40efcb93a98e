use serde::{Deserialize, Serialize};

/// Aggregated portal metrics for the admin analytics panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Users created in the last 30 days.
    pub new_users: i64,
    pub active_subscriptions: i64,
    pub expired_subscriptions: i64,
    /// Sum of completed transactions, in cents.
    pub revenue_cents: i64,
    /// Share of trial users who converted to paid, 0.0 when no trials exist.
    pub trial_conversion_rate: f64,
}

//! Payment routes. No gateway is wired up; a payment records a pending
//! transaction that an operator (or a future gateway callback) settles.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use persistence::repositories::TransactionRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

const DEFAULT_CURRENCY: &str = "EUR";

/// Request body for submitting a payment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount in cents.
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    #[validate(length(min = 1, message = "Payment method is required"))]
    pub method: String,

    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// POST /payments
pub async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    request.validate()?;

    let currency = request
        .currency
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let transaction = TransactionRepository::new(state.pool.clone())
        .insert(auth.user_id, request.amount, &currency, "pending")
        .await?;

    tracing::info!(
        user_id = %auth.user_id,
        amount_cents = request.amount,
        method = %request.method,
        "Payment recorded as pending"
    );

    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            id: transaction.id,
            amount_cents: transaction.amount_cents,
            currency: transaction.currency,
            status: transaction.status,
            created_at: transaction.created_at,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_amount_must_be_positive() {
        let request = PaymentRequest {
            amount: 0,
            method: "card".to_string(),
            currency: None,
        };
        assert!(request.validate().is_err());

        let request = PaymentRequest {
            amount: 999,
            method: "card".to_string(),
            currency: Some("USD".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}

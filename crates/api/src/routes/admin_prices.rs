//! Admin pricing routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use domain::models::{Price, PriceKind};
use persistence::repositories::price::PriceInput;
use persistence::repositories::PriceRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::record_audit;

#[derive(Debug, Serialize)]
pub struct PricesResponse {
    pub prices: Vec<Price>,
}

/// GET /admin/prices
pub async fn list_prices(State(state): State<AppState>) -> Result<Json<PricesResponse>, ApiError> {
    let prices = PriceRepository::new(state.pool.clone()).list().await?;
    Ok(Json(PricesResponse { prices }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub kind: String,

    #[validate(range(min = 0, message = "Amount must not be negative"))]
    pub amount_cents: i64,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    pub duration_days: Option<i32>,
}

impl PriceRequest {
    fn into_input(self) -> Result<PriceInput, ApiError> {
        let kind = PriceKind::from_str(&self.kind)
            .map_err(|_| ApiError::Validation(format!("Invalid price kind: {}", self.kind)))?;
        Ok(PriceInput {
            name: self.name,
            kind: kind.as_str().to_string(),
            amount_cents: self.amount_cents,
            currency: self.currency,
            duration_days: self.duration_days,
        })
    }
}

/// POST /admin/prices
pub async fn create_price(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<PriceRequest>,
) -> Result<(StatusCode, Json<Price>), ApiError> {
    request.validate()?;
    let price = PriceRepository::new(state.pool.clone())
        .create(request.into_input()?)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "create_price",
        "price",
        Some(price.id),
        serde_json::json!({ "name": price.name, "amountCents": price.amount_cents }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(price)))
}

/// PUT /admin/prices/:id
pub async fn update_price(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<Price>, ApiError> {
    request.validate()?;
    let price = PriceRepository::new(state.pool.clone())
        .update(id, request.into_input()?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Price not found".to_string()))?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_price",
        "price",
        Some(id),
        serde_json::json!({ "name": price.name, "amountCents": price.amount_cents }),
    )
    .await;

    Ok(Json(price))
}

/// DELETE /admin/prices/:id
pub async fn delete_price(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = PriceRepository::new(state.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Price not found".to_string()));
    }

    record_audit(
        &state.pool,
        auth.user_id,
        "delete_price",
        "price",
        Some(id),
        serde_json::json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk price adjustment. An empty or absent priceIds list targets every
/// price.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPriceRequest {
    #[serde(rename = "type")]
    pub adjustment: String,
    pub value: f64,
    #[serde(default)]
    pub price_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPriceResponse {
    pub affected: u64,
}

/// POST /admin/prices/bulk
pub async fn bulk_adjust_prices(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<BulkPriceRequest>,
) -> Result<Json<BulkPriceResponse>, ApiError> {
    let repo = PriceRepository::new(state.pool.clone());
    let ids = if request.price_ids.is_empty() {
        None
    } else {
        Some(request.price_ids.as_slice())
    };

    let affected = match request.adjustment.as_str() {
        "percent" => repo.adjust_by_percent(ids, request.value).await?,
        "fixed" => repo.adjust_by_fixed(ids, request.value.round() as i64).await?,
        other => {
            return Err(ApiError::Validation(format!(
                "Unknown adjustment type: {}",
                other
            )))
        }
    };

    record_audit(
        &state.pool,
        auth.user_id,
        "bulk_adjust_prices",
        "price",
        None,
        serde_json::json!({
            "type": request.adjustment,
            "value": request.value,
            "priceIds": request.price_ids,
            "affected": affected,
        }),
    )
    .await;

    Ok(Json(BulkPriceResponse { affected }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_request_rejects_bad_kind() {
        let request = PriceRequest {
            name: "Monthly".to_string(),
            kind: "mystery".to_string(),
            amount_cents: 999,
            currency: "EUR".to_string(),
            duration_days: Some(30),
        };
        assert!(request.into_input().is_err());
    }

    #[test]
    fn test_bulk_request_type_field() {
        let request: BulkPriceRequest = serde_json::from_value(serde_json::json!({
            "type": "percent",
            "value": 10.0
        }))
        .unwrap();
        assert_eq!(request.adjustment, "percent");
        assert!(request.price_ids.is_empty());
    }
}

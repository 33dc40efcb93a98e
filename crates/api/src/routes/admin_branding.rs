//! Admin branding routes. Branding is a single upserted row whose values
//! flow into every templated email.

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use domain::models::branding::is_hex_color;
use domain::models::Branding;
use persistence::repositories::branding::BrandingInput;
use persistence::repositories::BrandingRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::record_audit;

/// GET /admin/branding
pub async fn get_branding(State(state): State<AppState>) -> Result<Json<Branding>, ApiError> {
    let branding = BrandingRepository::new(state.pool.clone()).get().await?;
    Ok(Json(branding))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BrandingRequest {
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_url: String,

    #[validate(length(min = 1, max = 100, message = "Portal name must be 1-100 characters"))]
    pub portal_name: String,
}

/// PUT /admin/branding
pub async fn update_branding(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<BrandingRequest>,
) -> Result<Json<Branding>, ApiError> {
    request.validate()?;
    for (field, value) in [
        ("primaryColor", &request.primary_color),
        ("secondaryColor", &request.secondary_color),
    ] {
        if !is_hex_color(value) {
            return Err(ApiError::Validation(format!(
                "{} must be a #rrggbb hex color",
                field
            )));
        }
    }

    let branding = BrandingRepository::new(state.pool.clone())
        .upsert(BrandingInput {
            primary_color: request.primary_color,
            secondary_color: request.secondary_color,
            logo_url: request.logo_url,
            portal_name: request.portal_name,
        })
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_branding",
        "branding",
        None,
        serde_json::json!({ "portalName": branding.portal_name }),
    )
    .await;

    Ok(Json(branding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branding_request_parses() {
        let request: BrandingRequest = serde_json::from_value(serde_json::json!({
            "primaryColor": "#112233",
            "secondaryColor": "#ffffff",
            "logoUrl": "https://cdn.example.com/logo.png",
            "portalName": "StreamHub"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(is_hex_color(&request.primary_color));
        assert!(!is_hex_color("red"));
    }
}

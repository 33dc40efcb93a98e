//! Admin catalog routes: service offerings, page titles and tutorials.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use domain::models::{PageTitle, ServiceOffering, Tutorial, UserRole};
use persistence::repositories::CatalogRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::record_audit;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingsResponse {
    pub custom_services: Vec<ServiceOffering>,
}

/// GET /admin/custom-services
pub async fn list_custom_services(
    State(state): State<AppState>,
) -> Result<Json<OfferingsResponse>, ApiError> {
    let custom_services = CatalogRepository::new(state.pool.clone())
        .list_offerings()
        .await?;
    Ok(Json(OfferingsResponse { custom_services }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OfferingRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// POST /admin/custom-services
pub async fn create_custom_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<OfferingRequest>,
) -> Result<(StatusCode, Json<ServiceOffering>), ApiError> {
    request.validate()?;
    let offering = CatalogRepository::new(state.pool.clone())
        .create_offering(&request.name, &request.description)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "create_custom_service",
        "custom_service",
        Some(offering.id),
        serde_json::json!({ "name": offering.name }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(offering)))
}

/// PUT /admin/custom-services/:id
pub async fn update_custom_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<OfferingRequest>,
) -> Result<Json<ServiceOffering>, ApiError> {
    request.validate()?;
    let offering = CatalogRepository::new(state.pool.clone())
        .update_offering(id, &request.name, &request.description)
        .await?
        .ok_or_else(|| ApiError::NotFound("Custom service not found".to_string()))?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_custom_service",
        "custom_service",
        Some(id),
        serde_json::json!({ "name": offering.name }),
    )
    .await;

    Ok(Json(offering))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTitlesResponse {
    pub page_titles: Vec<PageTitle>,
}

/// GET /admin/page-titles
pub async fn list_page_titles(
    State(state): State<AppState>,
) -> Result<Json<PageTitlesResponse>, ApiError> {
    let page_titles = CatalogRepository::new(state.pool.clone())
        .list_page_titles()
        .await?;
    Ok(Json(PageTitlesResponse { page_titles }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageTitleRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
}

/// PUT /admin/page-titles/:id
///
/// Titles are edited in place; the page key itself never changes.
pub async fn update_page_title(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<PageTitleRequest>,
) -> Result<Json<PageTitle>, ApiError> {
    request.validate()?;
    let page_title = CatalogRepository::new(state.pool.clone())
        .update_page_title(id, &request.title)
        .await?
        .ok_or_else(|| ApiError::NotFound("Page title not found".to_string()))?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_page_title",
        "page_title",
        Some(id),
        serde_json::json!({ "page": page_title.page, "title": page_title.title }),
    )
    .await;

    Ok(Json(page_title))
}

#[derive(Debug, Serialize)]
pub struct TutorialsResponse {
    pub tutorials: Vec<Tutorial>,
}

/// GET /admin/tutorials
pub async fn list_tutorials(
    State(state): State<AppState>,
) -> Result<Json<TutorialsResponse>, ApiError> {
    let tutorials = CatalogRepository::new(state.pool.clone())
        .list_tutorials()
        .await?;
    Ok(Json(TutorialsResponse { tutorials }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TutorialRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Ordered setup steps, stored as JSON.
    #[serde(default = "empty_steps")]
    pub content: serde_json::Value,

    #[serde(default = "default_role")]
    pub for_role: String,
}

fn empty_steps() -> serde_json::Value {
    serde_json::json!([])
}

fn default_role() -> String {
    "user".to_string()
}

/// POST /admin/tutorials
pub async fn create_tutorial(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<TutorialRequest>,
) -> Result<(StatusCode, Json<Tutorial>), ApiError> {
    request.validate()?;
    UserRole::from_str(&request.for_role)
        .map_err(|_| ApiError::Validation(format!("Invalid role: {}", request.for_role)))?;

    let tutorial = CatalogRepository::new(state.pool.clone())
        .create_tutorial(&request.title, &request.content, &request.for_role)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "create_tutorial",
        "tutorial",
        Some(tutorial.id),
        serde_json::json!({ "title": tutorial.title, "forRole": tutorial.for_role }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(tutorial)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_request_defaults_description() {
        let request: OfferingRequest =
            serde_json::from_value(serde_json::json!({ "name": "Premium Channels" })).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.description, "");
    }

    #[test]
    fn test_offering_request_rejects_empty_name() {
        let request: OfferingRequest =
            serde_json::from_value(serde_json::json!({ "name": "" })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_tutorial_request_defaults() {
        let request: TutorialRequest =
            serde_json::from_value(serde_json::json!({ "title": "App Setup" })).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.for_role, "user");
        assert_eq!(request.content, serde_json::json!([]));
    }

    #[test]
    fn test_tutorial_steps_survive_deserialization() {
        let request: TutorialRequest = serde_json::from_value(serde_json::json!({
            "title": "App Setup",
            "content": [{ "step": "Download app" }, { "step": "Enter credentials" }],
            "forRole": "admin"
        }))
        .unwrap();
        assert_eq!(request.content.as_array().map(|s| s.len()), Some(2));
        assert_eq!(request.for_role, "admin");
    }
}

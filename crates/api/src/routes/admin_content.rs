//! Admin content routes: news posts and the portal footer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::{Footer, NewsItem};
use persistence::repositories::ContentRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::record_audit;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNewsQuery {
    /// When true, hides drafts.
    #[serde(default)]
    pub published_only: bool,
}

#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub news: Vec<NewsItem>,
}

/// GET /admin/content/news
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<ListNewsQuery>,
) -> Result<Json<NewsResponse>, ApiError> {
    let news = ContentRepository::new(state.pool.clone())
        .list_news(query.published_only)
        .await?;
    Ok(Json(NewsResponse { news }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewsRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,

    #[serde(default)]
    pub published: bool,
}

/// POST /admin/content/news
pub async fn create_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<NewsRequest>,
) -> Result<(StatusCode, Json<NewsItem>), ApiError> {
    request.validate()?;
    let item = ContentRepository::new(state.pool.clone())
        .create_news(&request.title, &request.body, request.published)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "create_news",
        "news",
        Some(item.id),
        serde_json::json!({ "title": item.title, "published": item.published }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /admin/content/news/:id
pub async fn update_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<NewsRequest>,
) -> Result<Json<NewsItem>, ApiError> {
    request.validate()?;
    let item = ContentRepository::new(state.pool.clone())
        .update_news(id, &request.title, &request.body, request.published)
        .await?
        .ok_or_else(|| ApiError::NotFound("News post not found".to_string()))?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_news",
        "news",
        Some(id),
        serde_json::json!({ "title": item.title, "published": item.published }),
    )
    .await;

    Ok(Json(item))
}

/// DELETE /admin/content/news/:id
pub async fn delete_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = ContentRepository::new(state.pool.clone())
        .delete_news(id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("News post not found".to_string()));
    }

    record_audit(
        &state.pool,
        auth.user_id,
        "delete_news",
        "news",
        Some(id),
        serde_json::json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/footer
pub async fn get_footer(State(state): State<AppState>) -> Result<Json<Option<Footer>>, ApiError> {
    let footer = ContentRepository::new(state.pool.clone()).get_footer().await?;
    Ok(Json(footer))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FooterRequest {
    #[validate(length(max = 1000, message = "Text must be at most 1000 characters"))]
    pub text: String,

    #[serde(default = "empty_links")]
    pub links: serde_json::Value,
}

fn empty_links() -> serde_json::Value {
    serde_json::json!([])
}

/// PUT /admin/footer
pub async fn update_footer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<FooterRequest>,
) -> Result<Json<Footer>, ApiError> {
    request.validate()?;
    let footer = ContentRepository::new(state.pool.clone())
        .upsert_footer(&request.text, &request.links)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_footer",
        "footer",
        None,
        serde_json::json!({}),
    )
    .await;

    Ok(Json(footer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_request_defaults_to_draft() {
        let request: NewsRequest = serde_json::from_value(serde_json::json!({
            "title": "Maintenance complete",
            "body": "All services are back to normal."
        }))
        .unwrap();
        assert!(!request.published);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_footer_request_defaults_links() {
        let request: FooterRequest =
            serde_json::from_value(serde_json::json!({ "text": "© StreamHub" })).unwrap();
        assert_eq!(request.links, serde_json::json!([]));
    }
}

//! Admin email template routes.
//!
//! Templates are versioned append-only: creating or editing a name inserts
//! the next version, never mutates prior rows. Markup is compiled at save
//! time so a broken template is rejected before any send depends on it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use domain::models::EmailTemplate;
use domain::services::template;
use persistence::repositories::{EmailTemplateRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::record_audit;
use crate::services::dispatch::{user_template_data, DispatchOptions};

fn check_markup(content: &str) -> Result<(), ApiError> {
    template::render(content, &HashMap::new())
        .map(|_| ())
        .map_err(|e| ApiError::Validation(format!("Template markup error: {}", e)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesQuery {
    /// When set, lists every version of this template name instead of the
    /// latest version of each name.
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<EmailTemplate>,
}

/// GET /admin/email-templates
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<ListTemplatesQuery>,
) -> Result<Json<TemplatesResponse>, ApiError> {
    let repo = EmailTemplateRepository::new(state.pool.clone());
    let templates = match query.name.as_deref() {
        Some(name) => repo.list_versions(name).await?,
        None => repo.list_latest().await?,
    };
    Ok(Json(TemplatesResponse { templates }))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// POST /admin/email-templates
pub async fn create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<EmailTemplate>), ApiError> {
    request.validate()?;
    check_markup(&request.content)?;

    let created = EmailTemplateRepository::new(state.pool.clone())
        .append_version(&request.name, &request.subject, &request.content)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "create_template",
        "email_template",
        Some(created.id),
        serde_json::json!({ "name": created.name, "version": created.version }),
    )
    .await;

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub subject: Option<String>,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// PUT /admin/email-templates/:id
///
/// The id selects which template's name to edit; the edit lands as a new
/// version at the head of that name's chain.
pub async fn update_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<EmailTemplate>, ApiError> {
    request.validate()?;
    check_markup(&request.content)?;

    let repo = EmailTemplateRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    let subject = request.subject.unwrap_or(existing.subject);
    let created = repo
        .append_version(&existing.name, &subject, &request.content)
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_template",
        "email_template",
        Some(created.id),
        serde_json::json!({ "name": created.name, "version": created.version }),
    )
    .await;

    Ok(Json(created))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, message = "Template name is required"))]
    pub template_name: String,

    #[serde(default)]
    pub data: HashMap<String, String>,
}

/// POST /admin/send-email
///
/// Renders the latest version of the named template for one user. Caller
/// data overrides the standard user placeholders.
pub async fn send_email(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    request.validate()?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(request.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // The named template must exist; delivery itself stays best-effort.
    EmailTemplateRepository::new(state.pool.clone())
        .latest_by_name(&request.template_name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    let mut data = user_template_data(&user);
    data.extend(request.data);
    state
        .dispatcher
        .dispatch(
            &user,
            &request.template_name,
            data,
            DispatchOptions::email_only(),
        )
        .await;

    record_audit(
        &state.pool,
        auth.user_id,
        "send_email",
        "user",
        Some(user.id),
        serde_json::json!({ "template": request.template_name }),
    )
    .await;

    Ok(Json(serde_json::json!({ "sent": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_markup_rejects_unknown_tags() {
        let good = "<mjml><mj-body><mj-section><mj-column>\
                    <mj-text>Hi {username}</mj-text>\
                    </mj-column></mj-section></mj-body></mjml>";
        assert!(check_markup(good).is_ok());

        let bad = "<mjml><mj-body><mj-marquee/></mj-body></mjml>";
        assert!(check_markup(bad).is_err());
    }

    #[test]
    fn test_create_template_request_validation() {
        let request = CreateTemplateRequest {
            name: "welcome".to_string(),
            subject: "Welcome!".to_string(),
            content: "<mjml><mj-body></mj-body></mjml>".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = CreateTemplateRequest {
            name: "".to_string(),
            subject: "Welcome!".to_string(),
            content: "x".to_string(),
        };
        assert!(request.validate().is_err());
    }
}

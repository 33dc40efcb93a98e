//! Admin user management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use domain::models::{User, UserRole};
use persistence::repositories::user::{CreateUserInput, UpdateUserInput};
use persistence::repositories::UserRepository;
use shared::{crypto, password};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::admin_logs::record_audit;
use crate::services::dispatch::{user_template_data, DispatchOptions};

const DEFAULT_PER_PAGE: i64 = 50;
const MAX_PER_PAGE: i64 = 200;

/// Distinguishes an absent field from an explicit null. Missing leaves the
/// column untouched; null clears it.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

fn parse_role(role: &str) -> Result<UserRole, ApiError> {
    UserRole::from_str(role).map_err(|_| ApiError::Validation(format!("Invalid role: {}", role)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Vec<User>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let page = query.page.unwrap_or(1).max(1);

    let users = UserRepository::new(state.pool.clone());
    let search = query.search.as_deref();
    let total = users.count(search).await?;
    let users = users.list(search, per_page, (page - 1) * per_page).await?;

    Ok(Json(ListUsersResponse {
        users,
        total,
        page,
        per_page,
    }))
}

/// Request body for creating a user. When no password is supplied a random
/// one is generated and included in the account email.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<String>,
    pub subscription_expiration: Option<DateTime<Utc>>,
    pub xc_username: Option<String>,
    pub xc_password: Option<String>,
    pub server_url: Option<String>,
    #[serde(default)]
    pub vod_enabled: bool,
    pub custom_services: Option<serde_json::Value>,
    #[serde(default)]
    pub trial_status: bool,
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    request.validate()?;

    let role = match &request.role {
        Some(role) => parse_role(role)?,
        None => UserRole::User,
    };

    let plaintext = request
        .password
        .clone()
        .unwrap_or_else(|| crypto::random_token(8));
    let password_hash = password::hash_password(&plaintext)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .create(CreateUserInput {
            email: request.email,
            password_hash,
            role: role.as_str().to_string(),
            subscription_expiration: request.subscription_expiration,
            xc_username: request.xc_username,
            xc_password: request.xc_password,
            server_url: request.server_url,
            vod_enabled: request.vod_enabled,
            custom_services: request
                .custom_services
                .unwrap_or_else(|| serde_json::json!([])),
            referral_code: crypto::referral_code(),
            trial_status: request.trial_status,
        })
        .await?;

    record_audit(
        &state.pool,
        auth.user_id,
        "create_user",
        "user",
        Some(user.id),
        serde_json::json!({ "email": user.email }),
    )
    .await;

    // Account email carries the credentials; failure never undoes the create.
    let mut data = user_template_data(&user);
    data.insert("password".to_string(), plaintext);
    state
        .dispatcher
        .dispatch(&user, "account_details", data, DispatchOptions::email_only())
        .await;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Partial update for a user. subscriptionExpiration distinguishes absent
/// (keep) from null (clear).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub subscription_expiration: Option<Option<DateTime<Utc>>>,
    pub xc_username: Option<String>,
    pub xc_password: Option<String>,
    pub server_url: Option<String>,
    pub vod_enabled: Option<bool>,
    pub custom_services: Option<serde_json::Value>,
    pub trial_status: Option<bool>,
    pub payment_status: Option<String>,
}

impl UpdateUserRequest {
    fn into_input(self) -> Result<UpdateUserInput, ApiError> {
        if let Some(role) = &self.role {
            parse_role(role)?;
        }
        Ok(UpdateUserInput {
            email: self.email,
            role: self.role,
            subscription_expiration: self.subscription_expiration,
            xc_username: self.xc_username,
            xc_password: self.xc_password,
            server_url: self.server_url,
            vod_enabled: self.vod_enabled,
            custom_services: self.custom_services,
            trial_status: self.trial_status,
            payment_status: self.payment_status,
        })
    }
}

/// PUT /admin/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let input = request.into_input()?;
    let user = UserRepository::new(state.pool.clone())
        .update(id, input)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    record_audit(
        &state.pool,
        auth.user_id,
        "update_user",
        "user",
        Some(id),
        serde_json::json!({ "email": user.email }),
    )
    .await;

    Ok(Json(user))
}

/// DELETE /admin/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = UserRepository::new(state.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    record_audit(
        &state.pool,
        auth.user_id,
        "delete_user",
        "user",
        Some(id),
        serde_json::json!({}),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk action over a list of user ids.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUsersRequest {
    pub action: String,
    pub user_ids: Vec<Uuid>,
    #[serde(default)]
    pub data: Option<UpdateUserRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUsersResponse {
    pub affected: u64,
}

/// POST /admin/users/bulk
///
/// `delete` removes exactly the listed ids, `edit` applies the supplied
/// field subset to all of them (every field except `email`, which is unique
/// per user and answers 400 here). `email` as an action is reserved and
/// answers 501 until a batched sender exists.
pub async fn bulk_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<BulkUsersRequest>,
) -> Result<Json<BulkUsersResponse>, ApiError> {
    if request.user_ids.is_empty() {
        return Err(ApiError::Validation("userIds must not be empty".to_string()));
    }

    let users = UserRepository::new(state.pool.clone());
    let affected = match request.action.as_str() {
        "delete" => users.delete_many(&request.user_ids).await?,
        "edit" => {
            let data = request
                .data
                .ok_or_else(|| ApiError::Validation("data is required for edit".to_string()))?;
            // The same email on many rows would violate uniqueness anyway.
            if data.email.is_some() {
                return Err(ApiError::Validation(
                    "email cannot be changed in a bulk edit".to_string(),
                ));
            }
            users.update_many(&request.user_ids, data.into_input()?).await?
        }
        "email" => {
            return Err(ApiError::NotImplemented(
                "Bulk email is not implemented".to_string(),
            ))
        }
        other => {
            return Err(ApiError::Validation(format!(
                "Unknown bulk action: {}",
                other
            )))
        }
    };

    record_audit(
        &state.pool,
        auth.user_id,
        &format!("bulk_{}_users", request.action),
        "user",
        None,
        serde_json::json!({ "userIds": request.user_ids, "affected": affected }),
    )
    .await;

    Ok(Json(BulkUsersResponse { affected }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_validation() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "email": "new@example.com"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.password.is_none());
        assert!(!request.vod_enabled);
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let request: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "subscriptionExpiration": null
        }))
        .unwrap();
        assert_eq!(request.subscription_expiration, Some(None));

        let request: UpdateUserRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(request.subscription_expiration, None);
    }

    #[test]
    fn test_invalid_role_rejected() {
        let request = UpdateUserRequest {
            role: Some("superuser".to_string()),
            ..Default::default()
        };
        assert!(request.into_input().is_err());
    }
}

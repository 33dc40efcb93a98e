//! Authentication routes: login, password reset and password change.

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::User;
use persistence::repositories::{ActivityLogRepository, PasswordResetRepository, UserRepository};
use shared::{crypto, password};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::dispatch::DispatchOptions;

/// How long an emailed reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Request body for login.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response body for successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Reads the client address from x-forwarded-for, if present.
pub fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

/// Authenticate with email and password.
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    // Missing user and wrong password answer identically.
    let user = users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = state.token_signer.sign(user.id, user.role.as_str())?;

    let logs = ActivityLogRepository::new(state.pool.clone());
    if let Err(e) = logs
        .insert(
            user.id,
            "login",
            serde_json::json!({}),
            forwarded_ip(&headers).as_deref(),
        )
        .await
    {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record login activity");
    }

    Ok(Json(LoginResponse { token, user }))
}

/// Request body for forgot-password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Uniform response for forgot-password, identical whether or not the
/// email is registered.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Issue a password reset token and email it.
///
/// POST /forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    let response = MessageResponse {
        message: "If that email is registered, a reset link has been sent.".to_string(),
    };

    let users = UserRepository::new(state.pool.clone());
    let Some(user) = users.find_by_email(&request.email).await? else {
        // Same answer as the success path, no account probing.
        return Ok(Json(response));
    };

    // Only the digest is stored; the plaintext token exists in the email alone.
    let token = crypto::random_token(32);
    let digest = crypto::sha256_hex(&token);
    let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

    let resets = PasswordResetRepository::new(state.pool.clone());
    resets.replace_for_user(user.id, &digest, expires_at).await?;

    let mut data = crate::services::dispatch::user_template_data(&user);
    data.insert(
        "reset_link".to_string(),
        format!(
            "{}/reset-password?token={}",
            state.config.email.base_url.trim_end_matches('/'),
            token
        ),
    );
    data.insert("reset_token".to_string(), token);

    state
        .dispatcher
        .dispatch(&user, "password_reset", data, DispatchOptions::email_only())
        .await;

    Ok(Json(response))
}

/// Request body for reset-password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Unknown, consumed and mismatched tokens all get the same 400 so the
/// response never reveals which check failed.
fn invalid_reset_token() -> ApiError {
    ApiError::Validation("Invalid or expired reset token".to_string())
}

/// Consume a reset token and set a new password.
///
/// POST /reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    let resets = PasswordResetRepository::new(state.pool.clone());
    let digest = crypto::sha256_hex(&request.token);
    let reset = resets
        .find_valid(&digest, Utc::now())
        .await?
        .ok_or_else(invalid_reset_token)?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(reset.user_id)
        .await?
        .ok_or_else(invalid_reset_token)?;

    // The token must have been issued for the email the caller claims.
    if !user.email.eq_ignore_ascii_case(&request.email) {
        return Err(invalid_reset_token());
    }

    let hash = password::hash_password(&request.new_password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;
    users.update_password(user.id, &hash).await?;

    // Consumed tokens are deleted so they cannot be replayed.
    resets.delete(reset.id).await?;

    Ok(Json(MessageResponse {
        message: "Password has been reset.".to_string(),
    }))
}

/// Request body for change-password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Change the authenticated user's password.
///
/// POST /change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Account no longer exists".to_string()))?;

    let valid = password::verify_password(&request.current_password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let hash = password::hash_password(&request.new_password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;
    users.update_password(user.id, &hash).await?;

    let logs = ActivityLogRepository::new(state.pool.clone());
    if let Err(e) = logs
        .insert(
            user.id,
            "change_password",
            serde_json::json!({}),
            forwarded_ip(&headers).as_deref(),
        )
        .await
    {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record password change");
    }

    Ok(Json(MessageResponse {
        message: "Password has been changed.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            email: "user@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_reset_password_requires_min_length() {
        let request = ResetPasswordRequest {
            email: "user@example.com".to_string(),
            token: "abc".to_string(),
            new_password: "short".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_bad_reset_token_answers_bad_request() {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        // A consumed or unknown token is a client error, not an auth failure.
        let response = invalid_reset_token().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_forwarded_ip_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.0.1, 10.0.0.2".parse().unwrap());
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("10.0.0.1"));
        assert_eq!(forwarded_ip(&HeaderMap::new()), None);
    }
}

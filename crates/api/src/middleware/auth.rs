//! Session token authentication middleware.
//!
//! Validates the Bearer token on protected routes and stores the
//! authenticated identity in request extensions for handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::UserRole;
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use crate::app::AppState;
use shared::token::extract_user_id;

/// Authenticated user information extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token subject claim.
    pub user_id: Uuid,
    /// Role carried in the token. Role changes take effect at next login.
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn validate(state: &AppState, token: &str) -> Result<AuthUser, String> {
    let claims = state
        .token_signer
        .verify(token)
        .map_err(|e| format!("Invalid token: {}", e))?;

    let user_id = extract_user_id(&claims).map_err(|_| "Invalid user ID in token".to_string())?;
    let role =
        UserRole::from_str(&claims.role).map_err(|_| "Invalid role in token".to_string())?;

    Ok(AuthUser { user_id, role })
}

/// Middleware that requires a valid session token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    match validate(&state, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Session token validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Middleware that requires a valid session token carrying the admin role.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    match validate(&state, token) {
        Ok(auth) if auth.is_admin() => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Ok(_) => forbidden_response("Admin access required"),
        Err(e) => {
            tracing::debug!("Session token validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let admin = AuthUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        };
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_unauthorized_response_status() {
        let response = unauthorized_response("nope");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response_status() {
        let response = forbidden_response("nope");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

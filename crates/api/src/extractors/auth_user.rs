//! Extractor pulling the authenticated user out of request extensions.
//!
//! The auth middleware inserts an `AuthUser` after validating the session
//! token; handlers take it as an argument instead of re-reading extensions.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::AuthUser;

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))
    }
}

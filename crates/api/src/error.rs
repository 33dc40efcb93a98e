use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Request-level error with a fixed HTTP mapping. Internal detail is logged
/// but never reaches the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Validation(_) => "validation_error",
            ApiError::RateLimited => "rate_limited",
            ApiError::NotImplemented(_) => "not_implemented",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match self {
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Validation(m)
            | ApiError::NotImplemented(m) => m,
            ApiError::RateLimited => "Too many requests. Please try again later.".to_string(),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "Request failed");
                "An internal error occurred".to_string()
            }
        };

        (
            status,
            Json(ErrorBody {
                error: code,
                message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return ApiError::NotFound("Resource not found".into());
        }

        // Unique and FK violations are the caller's mistake, not ours.
        if let sqlx::Error::Database(ref db) = err {
            match db.code().as_deref() {
                Some("23505") => return ApiError::Conflict("Resource already exists".into()),
                Some("23503") => {
                    return ApiError::NotFound("Referenced resource not found".into())
                }
                _ => {}
            }
        }

        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let joined = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let reason = e
                        .message
                        .as_deref()
                        .map(str::to_owned)
                        .unwrap_or_else(|| "invalid value".to_string());
                    format!("{}: {}", field, reason)
                })
            })
            .collect::<Vec<_>>()
            .join(", ");

        ApiError::Validation(joined)
    }
}

impl From<shared::token::TokenError> for ApiError {
    fn from(err: shared::token::TokenError) -> Self {
        match err {
            shared::token::TokenError::TokenExpired => {
                ApiError::Unauthorized("Token has expired".into())
            }
            _ => ApiError::Unauthorized("Invalid token".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn every_variant_maps_to_its_status() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (ApiError::Unauthorized("t".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("t".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("t".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("t".into()), StatusCode::CONFLICT),
            (ApiError::Validation("t".into()), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                ApiError::NotImplemented("t".into()),
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                ApiError::Internal("t".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn sqlx_row_not_found_becomes_404() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let error: ApiError = shared::token::TokenError::TokenExpired.into();
        assert!(matches!(error, ApiError::Unauthorized(_)));
    }

    #[test]
    fn display_keeps_the_detail() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(format!("{}", ApiError::RateLimited), "Rate limited");
        assert_eq!(
            format!("{}", ApiError::NotImplemented("bulk email".to_string())),
            "Not implemented: bulk email"
        );
    }
}

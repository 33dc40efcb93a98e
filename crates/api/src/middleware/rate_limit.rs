//! Rate limiting middleware for the public auth endpoints.
//!
//! Limits are tracked per client IP. Only login and the password reset
//! endpoints are rate limited; authenticated traffic is not.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

use crate::app::AppState;

type IpRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// One governor bucket per client IP, created lazily on first contact.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<IpAddr, Arc<IpRateLimiter>>>,
    limit_per_minute: u32,
}

impl RateLimiterState {
    pub fn new(limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            limit_per_minute,
        }
    }

    fn limiter_for(&self, ip: IpAddr) -> Arc<IpRateLimiter> {
        if let Some(existing) = self.limiters.read().unwrap().get(&ip) {
            return existing.clone();
        }

        let per_minute = NonZeroU32::new(self.limit_per_minute).unwrap_or(NonZeroU32::MIN);
        self.limiters
            .write()
            .unwrap()
            .entry(ip)
            .or_insert_with(|| Arc::new(GovRateLimiter::direct(Quota::per_minute(per_minute))))
            .clone()
    }

    /// Checks the bucket for `ip`. On rejection returns the seconds the
    /// caller should wait, never less than 1.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.limiter_for(ip).check().map_err(|not_until| {
            let now = governor::clock::Clock::now(&DefaultClock::default());
            not_until.wait_time_from(now).as_secs().max(1)
        })
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("limit_per_minute", &self.limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Resolves the client IP, honoring X-Forwarded-For when present (the
/// portal normally sits behind a reverse proxy).
fn client_ip(req: &Request<Body>) -> Option<IpAddr> {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            if let Ok(ip) = first.trim().parse() {
                return Some(ip);
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Middleware that enforces the per-IP limit on public auth routes.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = &state.rate_limiter else {
        return next.run(req).await;
    };

    let Some(ip) = client_ip(&req) else {
        // No resolvable client address; let the request through rather
        // than sharing one bucket across all unknown callers.
        return next.run(req).await;
    };

    match limiter.check(ip) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(ip = %ip, retry_after, "Rate limit exceeded on auth endpoint");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                Json(json!({
                    "error": "rate_limited",
                    "message": "Too many requests. Please try again later.",
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_allows_within_quota() {
        let state = RateLimiterState::new(5);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        for _ in 0..5 {
            assert!(state.check(ip).is_ok());
        }
    }

    #[test]
    fn test_limiter_blocks_over_quota() {
        let state = RateLimiterState::new(2);
        let ip: IpAddr = "10.0.0.2".parse().unwrap();
        assert!(state.check(ip).is_ok());
        assert!(state.check(ip).is_ok());
        let retry = state.check(ip);
        assert!(retry.is_err());
        assert!(retry.unwrap_err() >= 1);
    }

    #[test]
    fn test_limiter_is_per_ip() {
        let state = RateLimiterState::new(1);
        let a: IpAddr = "10.0.0.3".parse().unwrap();
        let b: IpAddr = "10.0.0.4".parse().unwrap();
        assert!(state.check(a).is_ok());
        assert!(state.check(b).is_ok());
        assert!(state.check(a).is_err());
    }
}

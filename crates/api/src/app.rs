use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, require_auth,
    RateLimiterState,
};
use crate::routes::{
    admin_analytics, admin_branding, admin_catalog, admin_content, admin_logs, admin_prices,
    admin_status, admin_templates, admin_tickets, admin_users, auth, dashboard, health, payments,
    tickets,
};
use crate::services::dispatch::Dispatcher;
use crate::services::email::EmailService;
use shared::token::TokenSigner;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub token_signer: TokenSigner,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let config = Arc::new(config);

        let token_signer = TokenSigner::new(
            &config.jwt.secret,
            config.jwt.token_expiry_secs,
            config.jwt.leeway_secs,
        );

        // Rate limiting applies to the public auth routes; 0 disables it.
        let rate_limiter = if config.security.auth_rate_limit_per_minute > 0 {
            Some(Arc::new(RateLimiterState::new(
                config.security.auth_rate_limit_per_minute,
            )))
        } else {
            None
        };

        let email = EmailService::new(config.email.clone());
        let dispatcher = Dispatcher::new(pool.clone(), email);

        Self {
            pool,
            config,
            token_signer,
            rate_limiter,
            dispatcher,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Credential endpoints are the brute-force surface, so only these are
    // rate limited per client IP.
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_handler));

    // Authenticated user routes
    let user_routes = Router::new()
        .route("/user/dashboard", get(dashboard::dashboard))
        .route("/user/notifications", get(dashboard::list_notifications))
        .route(
            "/user/notifications/:id/read",
            post(dashboard::mark_notification_read),
        )
        .route("/user/activity-logs", get(dashboard::list_activity_logs))
        .route(
            "/user/tickets",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route("/user/tickets/:id/reply", post(tickets::reply_to_ticket))
        .route("/change-password", post(auth::change_password))
        .route("/payments", post(payments::create_payment))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin routes
    let admin_routes = Router::new()
        .route(
            "/admin/users",
            get(admin_users::list_users).post(admin_users::create_user),
        )
        .route(
            "/admin/users/:id",
            put(admin_users::update_user).delete(admin_users::delete_user),
        )
        .route("/admin/users/bulk", post(admin_users::bulk_users))
        .route("/admin/tickets", get(admin_tickets::list_tickets))
        .route(
            "/admin/tickets/:id/reply",
            post(admin_tickets::reply_to_ticket),
        )
        .route(
            "/admin/tickets/:id/status",
            put(admin_tickets::set_ticket_status),
        )
        .route(
            "/admin/email-templates",
            get(admin_templates::list_templates).post(admin_templates::create_template),
        )
        .route(
            "/admin/email-templates/:id",
            put(admin_templates::update_template),
        )
        .route("/admin/send-email", post(admin_templates::send_email))
        .route(
            "/admin/service-status",
            get(admin_status::get_status).post(admin_status::announce_status),
        )
        .route(
            "/admin/prices",
            get(admin_prices::list_prices).post(admin_prices::create_price),
        )
        .route(
            "/admin/prices/:id",
            put(admin_prices::update_price).delete(admin_prices::delete_price),
        )
        .route("/admin/prices/bulk", post(admin_prices::bulk_adjust_prices))
        .route(
            "/admin/branding",
            get(admin_branding::get_branding).put(admin_branding::update_branding),
        )
        .route("/admin/analytics", get(admin_analytics::get_analytics))
        .route("/admin/audit-logs", get(admin_logs::list_audit_logs))
        .route("/admin/activity-logs", get(admin_logs::list_activity_logs))
        .route(
            "/admin/content/news",
            get(admin_content::list_news).post(admin_content::create_news),
        )
        .route(
            "/admin/content/news/:id",
            put(admin_content::update_news).delete(admin_content::delete_news),
        )
        .route(
            "/admin/footer",
            get(admin_content::get_footer).put(admin_content::update_footer),
        )
        .route(
            "/admin/custom-services",
            get(admin_catalog::list_custom_services).post(admin_catalog::create_custom_service),
        )
        .route(
            "/admin/custom-services/:id",
            put(admin_catalog::update_custom_service),
        )
        .route("/admin/page-titles", get(admin_catalog::list_page_titles))
        .route(
            "/admin/page-titles/:id",
            put(admin_catalog::update_page_title),
        )
        .route(
            "/admin/tutorials",
            get(admin_catalog::list_tutorials).post(admin_catalog::create_tutorial),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

//! HTTP route handlers.

pub mod admin_analytics;
pub mod admin_branding;
pub mod admin_catalog;
pub mod admin_content;
pub mod admin_logs;
pub mod admin_prices;
pub mod admin_status;
pub mod admin_templates;
pub mod admin_tickets;
pub mod admin_users;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod payments;
pub mod tickets;

//! Domain layer for the portal backend.
//!
//! This crate contains:
//! - Domain models (users, tickets, notifications, templates, status)
//! - Pure domain services (template rendering and markup compilation)

pub mod models;
pub mod services;

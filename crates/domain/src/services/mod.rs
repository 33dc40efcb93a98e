//! Pure domain services.

pub mod template;

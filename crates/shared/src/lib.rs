//! Shared utilities for the portal backend.
//!
//! This crate provides functionality used across all other crates:
//! - Password hashing with Argon2id
//! - Session token signing and verification
//! - Random token generation and digest helpers

pub mod crypto;
pub mod password;
pub mod token;

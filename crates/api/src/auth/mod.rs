//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- session-token generation, validation, and cookie helpers.

pub mod jwt;
pub mod password;

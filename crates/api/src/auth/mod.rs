//! Authentication primitives.
//!
//! Tokens are issued by the external identity provider; this service only
//! validates them. See [`jwt`].

pub mod jwt;

/// Role name that grants administrative access.
pub const ROLE_ADMIN: &str = "admin";

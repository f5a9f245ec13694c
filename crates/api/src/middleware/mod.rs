//! Request extractors and middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`auth::OptionalAuth`] -- Same, but never rejects.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`maintenance::maintenance_gate`] -- Serves the placeholder while the site is down.

pub mod auth;
pub mod maintenance;
pub mod rbac;

//! Request handlers.
//!
//! Handlers delegate to the shared [`kindred_core::context::SiteConfigContext`]
//! and map errors via [`crate::error::AppError`].

pub mod site_config;

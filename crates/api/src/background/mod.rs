//! Long-running background tasks started alongside the HTTP server.

pub mod theme_presenter;

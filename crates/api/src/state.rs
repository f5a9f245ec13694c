use std::sync::Arc;

use kindred_core::context::{ColorSchemeSignal, SiteConfigContext};
use kindred_core::presenter::TokenSurface;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database pool. `None` when running against an in-memory settings store.
    pub pool: Option<kindred_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live theme and maintenance configuration.
    pub site_config: Arc<SiteConfigContext>,
    /// Process-wide "system prefers dark" signal, used when a request has no
    /// `Sec-CH-Prefers-Color-Scheme` hint. Seeded from `SYSTEM_PREFERS_DARK`
    /// and changed through `PUT /api/v1/admin/site-config/color-scheme`.
    pub color_scheme: ColorSchemeSignal,
    /// Design tokens kept current by the presenter task.
    pub theme_surface: Arc<RwLock<TokenSurface>>,
}

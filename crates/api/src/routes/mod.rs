pub mod health;
pub mod site_config;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /site-config                           public snapshot + effective theme
/// /site-config/theme.css                 design tokens as a stylesheet
/// /site-config/gate?path=                gate decision for a path
/// /site-config/maintenance/placeholder   placeholder view
///
/// /admin/site-config/theme               update theme (PUT)
/// /admin/site-config/theme/reset         reset theme (POST)
/// /admin/site-config/maintenance         update maintenance (PUT)
/// /admin/site-config/maintenance/reset   reset maintenance (POST)
/// /admin/site-config/export              export blob (GET)
/// /admin/site-config/import              import blob (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/site-config", site_config::public_router())
        .nest("/admin/site-config", site_config::admin_router())
}

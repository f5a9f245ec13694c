//! Route definitions for the site configuration.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::site_config;
use crate::state::AppState;

/// Public routes mounted at `/site-config`.
///
/// ```text
/// GET /                         -> get_site_config
/// GET /theme.css                -> theme_stylesheet
/// GET /gate                     -> gate_decision
/// GET /maintenance/placeholder  -> maintenance_placeholder
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(site_config::get_site_config))
        .route("/theme.css", get(site_config::theme_stylesheet))
        .route("/gate", get(site_config::gate_decision))
        .route(
            "/maintenance/placeholder",
            get(site_config::maintenance_placeholder),
        )
}

/// Admin routes mounted at `/admin/site-config`.
///
/// ```text
/// PUT  /theme              -> update_theme
/// POST /theme/reset        -> reset_theme
/// PUT  /maintenance        -> update_maintenance
/// POST /maintenance/reset  -> reset_maintenance
/// PUT  /color-scheme       -> set_color_scheme
/// GET  /export             -> export_config
/// POST /import             -> import_config
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/theme", put(site_config::update_theme))
        .route("/theme/reset", post(site_config::reset_theme))
        .route("/maintenance", put(site_config::update_maintenance))
        .route("/maintenance/reset", post(site_config::reset_maintenance))
        .route("/color-scheme", put(site_config::set_color_scheme))
        .route("/export", get(site_config::export_config))
        .route("/import", post(site_config::import_config))
}

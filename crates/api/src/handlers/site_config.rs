//! Handlers for the site configuration: theme, maintenance, export/import.
//!
//! Public endpoints answer for the current snapshot; admin endpoints mutate it
//! and wait for the background save so the response can report which keys
//! reached the store.

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, VARY};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use kindred_core::context::ConfigSnapshot;
use kindred_core::gate::MaintenanceGate;
use kindred_core::maintenance::{MaintenanceConfig, MaintenanceMode, MaintenancePatch};
use kindred_core::persistence::SaveReport;
use kindred_core::presenter::{ThemePresenter, TokenSurface};
use kindred_core::resolver::ThemeResolver;
use kindred_core::theme::{ThemeConfig, ThemePatch};
use kindred_core::types::Timestamp;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuth;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Client hint carrying the browser's color-scheme preference.
pub const PREFERS_COLOR_SCHEME: HeaderName =
    HeaderName::from_static("sec-ch-prefers-color-scheme");

const ACCEPT_CH: HeaderName = HeaderName::from_static("accept-ch");

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Maintenance fields that are safe to show to anyone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMaintenance {
    pub enabled: bool,
    pub mode: MaintenanceMode,
    pub excluded_pages: Vec<String>,
    pub message: String,
    pub estimated_time: String,
}

impl From<&MaintenanceConfig> for PublicMaintenance {
    fn from(config: &MaintenanceConfig) -> Self {
        Self {
            enabled: config.enabled,
            mode: config.mode,
            excluded_pages: config.excluded_pages.clone(),
            message: config.message.clone(),
            estimated_time: config.estimated_time.clone(),
        }
    }
}

/// Public view of the site configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigView {
    pub version: u64,
    pub ready: bool,
    pub updated_at: Timestamp,
    /// Theme as the administrator saved it.
    pub theme: ThemeConfig,
    /// Theme with the colors that are actually rendered for this caller.
    pub effective_theme: ThemeConfig,
    pub prefers_dark: bool,
    pub maintenance: PublicMaintenance,
}

/// Result of an admin mutation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub config: ConfigSnapshot,
    pub save: SaveReport,
}

/// Result of an import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub sections: Vec<&'static str>,
    pub config: ConfigSnapshot,
    pub saves: Vec<SaveReport>,
}

/// Body and response of the color-scheme endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub prefers_dark: bool,
}

#[derive(Debug, Deserialize)]
pub struct GateQuery {
    pub path: String,
}

/// Resolve the caller's color-scheme preference: the client hint when it is
/// present and recognised, otherwise the process-wide signal.
fn prefers_dark(headers: &HeaderMap, state: &AppState) -> bool {
    let hint = headers
        .get(&PREFERS_COLOR_SCHEME)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().trim_matches('"'));
    match hint {
        Some("dark") => true,
        Some("light") => false,
        _ => state.color_scheme.get(),
    }
}

fn hint_headers() -> [(HeaderName, HeaderValue); 2] {
    [
        (ACCEPT_CH, HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme")),
        (VARY, HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme")),
    ]
}

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/site-config
pub async fn get_site_config(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let snapshot = state.site_config.snapshot();
    let dark = prefers_dark(&headers, &state);
    let effective_theme = ThemeResolver::effective(&snapshot.theme, dark);

    let view = SiteConfigView {
        version: snapshot.version,
        ready: snapshot.ready,
        updated_at: snapshot.updated_at,
        theme: snapshot.theme.clone(),
        effective_theme,
        prefers_dark: dark,
        maintenance: PublicMaintenance::from(&snapshot.maintenance),
    };

    (hint_headers(), Json(DataResponse { data: view }))
}

/// GET /api/v1/site-config/theme.css
///
/// Without a client hint this serves the tokens kept current by the
/// presenter task; with one it renders for the hinted scheme.
pub async fn theme_stylesheet(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let css = if headers.contains_key(&PREFERS_COLOR_SCHEME) {
        let mut surface = TokenSurface::new();
        ThemePresenter::present(
            &mut surface,
            &state.site_config.snapshot().theme,
            prefers_dark(&headers, &state),
        );
        surface.stylesheet()
    } else {
        let shared = state.theme_surface.read().await;
        if shared.tokens().is_empty() {
            drop(shared);
            let mut surface = TokenSurface::new();
            ThemePresenter::present(
                &mut surface,
                &state.site_config.snapshot().theme,
                state.color_scheme.get(),
            );
            surface.stylesheet()
        } else {
            shared.stylesheet()
        }
    };

    (
        [(CONTENT_TYPE, HeaderValue::from_static("text/css; charset=utf-8"))],
        hint_headers(),
        css,
    )
}

/// GET /api/v1/site-config/gate?path=
pub async fn gate_decision(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Query(query): Query<GateQuery>,
) -> impl IntoResponse {
    let snapshot = state.site_config.snapshot();
    let decision = MaintenanceGate::decide(&snapshot.maintenance, &query.path, auth.is_privileged());
    Json(DataResponse { data: decision })
}

/// GET /api/v1/site-config/maintenance/placeholder
pub async fn maintenance_placeholder(
    State(state): State<AppState>,
    auth: OptionalAuth,
) -> impl IntoResponse {
    let snapshot = state.site_config.snapshot();
    let placeholder = MaintenanceGate::placeholder(&snapshot.maintenance, auth.is_privileged());
    Json(DataResponse { data: placeholder })
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// PUT /api/v1/admin/site-config/theme
pub async fn update_theme(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<ThemePatch>,
) -> AppResult<impl IntoResponse> {
    let handle = state.site_config.update_theme(&patch)?;
    let config = ConfigSnapshot::clone(&state.site_config.snapshot());
    let save = handle.wait().await;

    tracing::info!(
        subject = %admin.subject,
        version = config.version,
        saved = save.written.len(),
        failed = save.failed.len(),
        "Theme updated via API",
    );

    Ok(Json(DataResponse {
        data: UpdateResult { config, save },
    }))
}

/// PUT /api/v1/admin/site-config/maintenance
pub async fn update_maintenance(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<MaintenancePatch>,
) -> AppResult<impl IntoResponse> {
    let handle = state.site_config.update_maintenance(&patch)?;
    let config = ConfigSnapshot::clone(&state.site_config.snapshot());
    let save = handle.wait().await;

    tracing::info!(
        subject = %admin.subject,
        version = config.version,
        enabled = config.maintenance.enabled,
        failed = save.failed.len(),
        "Maintenance updated via API",
    );

    Ok(Json(DataResponse {
        data: UpdateResult { config, save },
    }))
}

/// POST /api/v1/admin/site-config/theme/reset
pub async fn reset_theme(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let handle = state.site_config.reset_theme();
    let config = ConfigSnapshot::clone(&state.site_config.snapshot());
    let save = handle.wait().await;

    tracing::info!(subject = %admin.subject, version = config.version, "Theme reset via API");

    Ok(Json(DataResponse {
        data: UpdateResult { config, save },
    }))
}

/// POST /api/v1/admin/site-config/maintenance/reset
pub async fn reset_maintenance(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let handle = state.site_config.reset_maintenance();
    let config = ConfigSnapshot::clone(&state.site_config.snapshot());
    let save = handle.wait().await;

    tracing::info!(
        subject = %admin.subject,
        version = config.version,
        "Maintenance reset via API",
    );

    Ok(Json(DataResponse {
        data: UpdateResult { config, save },
    }))
}

/// PUT /api/v1/admin/site-config/color-scheme
///
/// Sets the process-wide preference used when a request carries no client
/// hint. The presenter task re-renders the shared stylesheet in `auto` mode.
pub async fn set_color_scheme(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ColorScheme>,
) -> impl IntoResponse {
    let changed = state.color_scheme.set(body.prefers_dark);

    tracing::info!(
        subject = %admin.subject,
        prefers_dark = body.prefers_dark,
        changed,
        "System color scheme set via API",
    );

    Json(DataResponse {
        data: ColorScheme {
            prefers_dark: state.color_scheme.get(),
        },
    })
}

/// GET /api/v1/admin/site-config/export
///
/// Returns the raw blob (not enveloped) as a downloadable attachment.
pub async fn export_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let blob = state.site_config.export()?;

    tracing::info!(subject = %admin.subject, bytes = blob.len(), "Site configuration exported");

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (
                CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=\"site-config.json\""),
            ),
        ],
        blob,
    ))
}

/// POST /api/v1/admin/site-config/import
///
/// Body is a blob produced by the export endpoint (or a subset of it).
pub async fn import_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    body: String,
) -> AppResult<impl IntoResponse> {
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("Import body is empty".into()));
    }
    let outcome = state.site_config.import(&body)?;
    let sections = outcome.sections.clone();
    let config = ConfigSnapshot::clone(&state.site_config.snapshot());
    let saves = outcome.wait().await;

    tracing::info!(
        subject = %admin.subject,
        sections = ?sections,
        version = config.version,
        "Site configuration imported via API",
    );

    Ok(Json(DataResponse {
        data: ImportResult {
            sections,
            config,
            saves,
        },
    }))
}

//! Maintenance gate for site pages.
//!
//! The control plane (`/health` and everything under `/api/`) is never
//! gated, so an administrator can always reach the switch that turns
//! maintenance off. Every other path goes through
//! [`MaintenanceGate::decide`] with the caller's privilege.

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kindred_core::gate::{GateDecision, MaintenanceGate};

use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Set on responses served to a privileged caller during maintenance.
pub const BYPASS_HEADER: HeaderName = HeaderName::from_static("x-maintenance-bypass");

/// Whether a path belongs to the control plane.
pub fn is_exempt(path: &str) -> bool {
    path == "/health" || path.starts_with("/api/")
}

pub async fn maintenance_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if is_exempt(&path) {
        return next.run(req).await;
    }

    let privileged = AuthUser::from_headers(req.headers(), &state.config.jwt)
        .is_ok_and(|user| user.is_admin());
    let snapshot = state.site_config.snapshot();

    match MaintenanceGate::decide(&snapshot.maintenance, &path, privileged) {
        GateDecision::Open | GateDecision::Excluded => next.run(req).await,
        GateDecision::Bypassed => {
            tracing::debug!(path = %path, "Maintenance bypassed by privileged caller");
            let mut response = next.run(req).await;
            response
                .headers_mut()
                .insert(BYPASS_HEADER, HeaderValue::from_static("true"));
            response
        }
        GateDecision::Blocked { placeholder } => {
            tracing::debug!(path = %path, "Request held by maintenance gate");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DataResponse { data: placeholder }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_plane_is_exempt() {
        assert!(is_exempt("/health"));
        assert!(is_exempt("/api/v1/site-config"));
        assert!(is_exempt("/api/v1/admin/site-config/maintenance"));
    }

    #[test]
    fn site_pages_are_not_exempt() {
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/healthy-living"));
        assert!(!is_exempt("/api"));
        assert!(!is_exempt("/donate"));
    }
}

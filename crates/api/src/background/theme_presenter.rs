//! Keeps the shared design-token surface in step with the site config.
//!
//! The surface behind `AppState::theme_surface` is what
//! `GET /api/v1/site-config/theme.css` serves when the caller sends no
//! color-scheme hint.

use kindred_core::presenter::PresenterTask;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Spawn the presenter task for `state`. It runs until `cancel` fires.
pub fn start(state: &AppState, cancel: CancellationToken) -> PresenterTask {
    PresenterTask::spawn(
        state.theme_surface.clone(),
        state.site_config.subscribe(),
        state.color_scheme.subscribe(),
        cancel,
    )
}

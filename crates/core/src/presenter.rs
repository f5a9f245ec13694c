//! Publishing an effective theme as design tokens and root markers.
//!
//! [`ThemePresenter::apply`] writes to any [`DesignSurface`]. The API keeps a
//! shared [`TokenSurface`] current through a [`PresenterTask`] and serves it
//! as a stylesheet.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::context::ConfigSnapshot;
use crate::resolver::ThemeResolver;
use crate::theme::{ColorSlot, ThemeConfig, ThemeMode};

pub const TOKEN_BORDER_RADIUS: &str = "--border-radius";
pub const TOKEN_FONT_SIZE_BASE: &str = "--font-size-base";
pub const TOKEN_FONT_FAMILY: &str = "--font-family";

pub const MARKER_LIGHT: &str = "theme-light";
pub const MARKER_DARK: &str = "theme-dark";
pub const MARKER_ANIMATIONS_DISABLED: &str = "animations-disabled";
pub const MARKER_SHADOWS_DISABLED: &str = "shadows-disabled";

/// Somewhere design tokens and root markers can be published.
pub trait DesignSurface {
    fn set_token(&mut self, name: &str, value: &str);
    fn remove_token(&mut self, name: &str);
    fn add_marker(&mut self, marker: &str);
    fn remove_marker(&mut self, marker: &str);
}

pub struct ThemePresenter;

impl ThemePresenter {
    /// Publish `effective` onto `surface`.
    ///
    /// In `auto` mode the mode marker follows `system_prefers_dark`. Applying
    /// the same inputs twice leaves the surface unchanged.
    pub fn apply(surface: &mut dyn DesignSurface, effective: &ThemeConfig, system_prefers_dark: bool) {
        for slot in ColorSlot::ALL {
            surface.set_token(slot.token(), effective.colors.get(slot));
        }
        surface.set_token(
            TOKEN_BORDER_RADIUS,
            &format!("{}px", effective.border_radius.px()),
        );
        surface.set_token(
            TOKEN_FONT_SIZE_BASE,
            &format!("{}px", effective.font_size.px()),
        );
        surface.set_token(TOKEN_FONT_FAMILY, &effective.font_family);

        let dark = match effective.mode {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::Auto => system_prefers_dark,
        };
        let (active, inactive) = if dark {
            (MARKER_DARK, MARKER_LIGHT)
        } else {
            (MARKER_LIGHT, MARKER_DARK)
        };
        surface.remove_marker(inactive);
        surface.add_marker(active);

        toggle_marker(surface, MARKER_ANIMATIONS_DISABLED, !effective.animations);
        toggle_marker(surface, MARKER_SHADOWS_DISABLED, !effective.shadows);
    }

    /// Withdraw every token and marker [`apply`](Self::apply) can publish.
    pub fn clear(surface: &mut dyn DesignSurface) {
        for slot in ColorSlot::ALL {
            surface.remove_token(slot.token());
        }
        for token in [TOKEN_BORDER_RADIUS, TOKEN_FONT_SIZE_BASE, TOKEN_FONT_FAMILY] {
            surface.remove_token(token);
        }
        for marker in [
            MARKER_LIGHT,
            MARKER_DARK,
            MARKER_ANIMATIONS_DISABLED,
            MARKER_SHADOWS_DISABLED,
        ] {
            surface.remove_marker(marker);
        }
    }

    /// Resolve the effective theme for `stored` and publish it.
    pub fn present(surface: &mut dyn DesignSurface, stored: &ThemeConfig, system_prefers_dark: bool) {
        let effective = ThemeResolver::effective(stored, system_prefers_dark);
        Self::apply(surface, &effective, system_prefers_dark);
    }
}

fn toggle_marker(surface: &mut dyn DesignSurface, marker: &str, on: bool) {
    if on {
        surface.add_marker(marker);
    } else {
        surface.remove_marker(marker);
    }
}

// ---------------------------------------------------------------------------
// TokenSurface
// ---------------------------------------------------------------------------

/// In-memory surface. Tokens keep first-insertion order; markers are a set
/// in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSurface {
    tokens: Vec<(String, String)>,
    markers: Vec<String>,
}

impl TokenSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self, name: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn tokens(&self) -> &[(String, String)] {
        &self.tokens
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }

    /// Space-separated markers, suitable for a root `class` attribute.
    pub fn class_list(&self) -> String {
        self.markers.join(" ")
    }

    /// Render the tokens as a `:root` stylesheet.
    pub fn stylesheet(&self) -> String {
        let mut css = format!("/* markers: {} */\n:root {{\n", self.class_list());
        for (name, value) in &self.tokens {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
        css
    }
}

impl DesignSurface for TokenSurface {
    fn set_token(&mut self, name: &str, value: &str) {
        match self.tokens.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => {
                if existing != value {
                    *existing = value.to_string();
                }
            }
            None => self.tokens.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_token(&mut self, name: &str) {
        self.tokens.retain(|(n, _)| n != name);
    }

    fn add_marker(&mut self, marker: &str) {
        if !self.has_marker(marker) {
            self.markers.push(marker.to_string());
        }
    }

    fn remove_marker(&mut self, marker: &str) {
        self.markers.retain(|m| m != marker);
    }
}

// ---------------------------------------------------------------------------
// PresenterTask
// ---------------------------------------------------------------------------

/// Standing task that keeps a shared [`TokenSurface`] in step with the
/// configuration snapshot and the system color-scheme signal. On
/// cancellation it clears what it published.
pub struct PresenterTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PresenterTask {
    /// Apply the current snapshot, then re-apply on every change until
    /// `cancel` fires or either sender is dropped.
    pub fn spawn(
        surface: Arc<RwLock<TokenSurface>>,
        snapshots: watch::Receiver<Arc<ConfigSnapshot>>,
        prefers_dark: watch::Receiver<bool>,
        cancel: CancellationToken,
    ) -> Self {
        let handle = tokio::spawn(run(surface, snapshots, prefers_dark, cancel.clone()));
        Self { cancel, handle }
    }

    /// Cancel the task and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Theme presenter task panicked");
        }
    }
}

async fn run(
    surface: Arc<RwLock<TokenSurface>>,
    mut snapshots: watch::Receiver<Arc<ConfigSnapshot>>,
    mut prefers_dark: watch::Receiver<bool>,
    cancel: CancellationToken,
) {
    let mut theme = snapshots.borrow_and_update().theme.clone();
    let mut dark = *prefers_dark.borrow_and_update();
    ThemePresenter::present(&mut *surface.write().await, &theme, dark);
    tracing::info!(mode = theme.mode.as_str(), "Theme presenter started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                ThemePresenter::clear(&mut *surface.write().await);
                tracing::info!("Theme presenter stopping");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    tracing::debug!("Configuration context dropped, theme presenter exiting");
                    break;
                }
                theme = snapshots.borrow_and_update().theme.clone();
                ThemePresenter::present(&mut *surface.write().await, &theme, dark);
                tracing::debug!(mode = theme.mode.as_str(), "Theme re-applied after update");
            }
            changed = prefers_dark.changed() => {
                if changed.is_err() {
                    tracing::debug!("Color scheme signal dropped, theme presenter exiting");
                    break;
                }
                dark = *prefers_dark.borrow_and_update();
                if theme.mode == ThemeMode::Auto {
                    ThemePresenter::present(&mut *surface.write().await, &theme, dark);
                    tracing::debug!(prefers_dark = dark, "Theme re-applied after system change");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::context::{ColorSchemeSignal, SiteConfigContext};
    use crate::store::MemorySettingsStore;
    use crate::theme::{BorderRadius, FontSize, ThemePatch, DARK_PALETTE, LIGHT_PALETTE};

    #[test]
    fn publishes_all_tokens_for_defaults() {
        let mut surface = TokenSurface::new();
        ThemePresenter::apply(&mut surface, &ThemeConfig::default(), false);

        assert_eq!(surface.tokens().len(), 15);
        assert_eq!(surface.token("--color-primary"), Some(LIGHT_PALETTE[0]));
        assert_eq!(surface.token("--color-text-secondary"), Some(LIGHT_PALETTE[6]));
        assert_eq!(surface.token(TOKEN_BORDER_RADIUS), Some("8px"));
        assert_eq!(surface.token(TOKEN_FONT_SIZE_BASE), Some("16px"));
        assert_eq!(
            surface.token(TOKEN_FONT_FAMILY),
            Some("Inter, system-ui, sans-serif")
        );
        assert_eq!(surface.markers(), [MARKER_LIGHT.to_string()]);
    }

    #[test]
    fn apply_is_idempotent() {
        let theme = ThemeConfig {
            mode: ThemeMode::Dark,
            animations: false,
            ..Default::default()
        };
        let mut once = TokenSurface::new();
        ThemePresenter::present(&mut once, &theme, false);
        let mut twice = once.clone();
        ThemePresenter::present(&mut twice, &theme, false);

        assert_eq!(once, twice);
        assert_eq!(once.class_list(), twice.class_list());
        assert_eq!(once.stylesheet(), twice.stylesheet());
    }

    #[test]
    fn toggling_animations_then_reapplying_keeps_marker_order() {
        let mut surface = TokenSurface::new();
        ThemePresenter::present(&mut surface, &ThemeConfig::default(), false);

        let off = ThemeConfig {
            animations: false,
            shadows: false,
            ..Default::default()
        };
        ThemePresenter::present(&mut surface, &off, false);
        let first = surface.clone();
        ThemePresenter::present(&mut surface, &off, false);

        assert_eq!(surface.markers(), first.markers());
        assert_eq!(
            surface.class_list(),
            "theme-light animations-disabled shadows-disabled"
        );
        assert_eq!(surface.stylesheet(), first.stylesheet());
    }

    #[test]
    fn disabling_animations_adds_marker_without_touching_colors() {
        let mut surface = TokenSurface::new();
        ThemePresenter::present(&mut surface, &ThemeConfig::default(), false);
        let colors_before: Vec<_> = surface.tokens()[..12].to_vec();

        let theme = ThemeConfig {
            animations: false,
            ..Default::default()
        };
        ThemePresenter::present(&mut surface, &theme, false);

        assert!(surface.has_marker(MARKER_ANIMATIONS_DISABLED));
        assert!(!surface.has_marker(MARKER_SHADOWS_DISABLED));
        assert_eq!(&surface.tokens()[..12], colors_before.as_slice());
    }

    #[test]
    fn re_enabling_flags_removes_markers() {
        let mut surface = TokenSurface::new();
        let off = ThemeConfig {
            animations: false,
            shadows: false,
            ..Default::default()
        };
        ThemePresenter::present(&mut surface, &off, false);
        assert!(surface.has_marker(MARKER_SHADOWS_DISABLED));

        ThemePresenter::present(&mut surface, &ThemeConfig::default(), false);
        assert!(!surface.has_marker(MARKER_ANIMATIONS_DISABLED));
        assert!(!surface.has_marker(MARKER_SHADOWS_DISABLED));
    }

    #[test]
    fn exactly_one_mode_marker() {
        let mut surface = TokenSurface::new();
        let auto = ThemeConfig {
            mode: ThemeMode::Auto,
            ..Default::default()
        };
        ThemePresenter::present(&mut surface, &auto, true);
        assert!(surface.has_marker(MARKER_DARK));
        assert!(!surface.has_marker(MARKER_LIGHT));

        ThemePresenter::present(&mut surface, &auto, false);
        assert!(surface.has_marker(MARKER_LIGHT));
        assert!(!surface.has_marker(MARKER_DARK));
        assert_eq!(surface.token("--color-background"), Some(LIGHT_PALETTE[3]));
    }

    #[test]
    fn derived_tokens_follow_enums() {
        let mut surface = TokenSurface::new();
        let theme = ThemeConfig {
            border_radius: BorderRadius::None,
            font_size: FontSize::Large,
            ..Default::default()
        };
        ThemePresenter::present(&mut surface, &theme, false);
        assert_eq!(surface.token(TOKEN_BORDER_RADIUS), Some("0px"));
        assert_eq!(surface.token(TOKEN_FONT_SIZE_BASE), Some("18px"));
    }

    #[test]
    fn stylesheet_renders_root_block() {
        let mut surface = TokenSurface::new();
        ThemePresenter::present(&mut surface, &ThemeConfig::default(), false);
        let css = surface.stylesheet();

        assert!(css.starts_with("/* markers: theme-light */\n:root {\n"));
        assert!(css.contains("  --color-primary: #3b82f6;\n"));
        assert!(css.ends_with("}\n"));
    }

    async fn wait_for(surface: &Arc<RwLock<TokenSurface>>, marker: &str) -> bool {
        for _ in 0..200 {
            if surface.read().await.has_marker(marker) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn task_reapplies_on_signal_flip_in_auto_mode() {
        let ctx = SiteConfigContext::new(Arc::new(MemorySettingsStore::new()));
        ctx.update_theme(&ThemePatch {
            mode: Some(ThemeMode::Auto),
            ..Default::default()
        })
        .unwrap();
        let signal = ColorSchemeSignal::new(false);
        let surface = Arc::new(RwLock::new(TokenSurface::new()));
        let task = PresenterTask::spawn(
            surface.clone(),
            ctx.subscribe(),
            signal.subscribe(),
            CancellationToken::new(),
        );

        assert!(wait_for(&surface, MARKER_LIGHT).await);
        signal.set(true);
        assert!(wait_for(&surface, MARKER_DARK).await);
        assert_eq!(
            surface.read().await.token("--color-background"),
            Some(DARK_PALETTE[3])
        );

        task.stop().await;
    }

    #[tokio::test]
    async fn task_reapplies_on_config_update() {
        let ctx = SiteConfigContext::new(Arc::new(MemorySettingsStore::new()));
        let signal = ColorSchemeSignal::new(false);
        let surface = Arc::new(RwLock::new(TokenSurface::new()));
        let task = PresenterTask::spawn(
            surface.clone(),
            ctx.subscribe(),
            signal.subscribe(),
            CancellationToken::new(),
        );

        ctx.update_theme(&ThemePatch {
            shadows: Some(false),
            ..Default::default()
        })
        .unwrap();

        assert!(wait_for(&surface, MARKER_SHADOWS_DISABLED).await);
        task.stop().await;
    }

    #[tokio::test]
    async fn nothing_is_applied_after_cancellation() {
        let ctx = SiteConfigContext::new(Arc::new(MemorySettingsStore::new()));
        ctx.update_theme(&ThemePatch {
            mode: Some(ThemeMode::Auto),
            ..Default::default()
        })
        .unwrap();
        let signal = ColorSchemeSignal::new(false);
        let surface = Arc::new(RwLock::new(TokenSurface::new()));
        let task = PresenterTask::spawn(
            surface.clone(),
            ctx.subscribe(),
            signal.subscribe(),
            CancellationToken::new(),
        );
        assert!(wait_for(&surface, MARKER_LIGHT).await);

        task.stop().await;
        assert!(surface.read().await.tokens().is_empty());
        assert!(surface.read().await.markers().is_empty());

        signal.set(true);
        ctx.update_theme(&ThemePatch {
            shadows: Some(false),
            ..Default::default()
        })
        .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(surface.read().await.tokens().is_empty());
        assert!(!surface.read().await.has_marker(MARKER_DARK));
    }

    #[test]
    fn clear_withdraws_everything_apply_published() {
        let mut surface = TokenSurface::new();
        let theme = ThemeConfig {
            mode: ThemeMode::Dark,
            animations: false,
            shadows: false,
            ..Default::default()
        };
        ThemePresenter::present(&mut surface, &theme, false);
        surface.set_token("--brand-logo", "url(logo.svg)");

        ThemePresenter::clear(&mut surface);

        assert_eq!(surface.tokens(), [("--brand-logo".to_string(), "url(logo.svg)".to_string())]);
        assert!(surface.markers().is_empty());
    }
}

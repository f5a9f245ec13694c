//! Resolution of raw stored settings into complete config objects.
//!
//! Resolution is tolerant: a malformed stored value for one field falls back
//! to that field's default and never fails the whole config.

use serde::Serialize;

use crate::maintenance::{
    validate_page_prefix, MaintenanceConfig, MaintenanceMode, MAX_ESTIMATED_TIME_LEN,
    MAX_MESSAGE_LEN,
};
use crate::schema::{parse_bool, SettingKey};
use crate::theme::{
    is_valid_color, is_valid_font_family, BorderRadius, ColorSlot, FontSize, ThemeColors,
    ThemeConfig, ThemeMode,
};
use crate::types::RawSettings;

/// Stored theme plus the colors that are actually rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTheme {
    /// The preference as the administrator saved it.
    pub stored: ThemeConfig,
    /// The stored preference with its colors replaced by the effective set.
    pub effective: ThemeConfig,
}

pub struct ThemeResolver;

impl ThemeResolver {
    /// Resolve raw settings against a live system color-scheme signal.
    pub fn resolve(raw: &RawSettings, system_prefers_dark: bool) -> ResolvedTheme {
        let stored = Self::resolve_stored(raw);
        let effective = Self::effective(&stored, system_prefers_dark);
        ResolvedTheme { stored, effective }
    }

    /// Overlay raw settings onto the built-in defaults.
    pub fn resolve_stored(raw: &RawSettings) -> ThemeConfig {
        let mut theme = ThemeConfig::default();
        let get = |key: SettingKey| raw.get(key.key()).map(String::as_str);

        if let Some(value) = get(SettingKey::ThemeMode) {
            match ThemeMode::from_str(value) {
                Ok(mode) => theme.mode = mode,
                Err(e) => tracing::debug!(error = %e, "Stored theme mode ignored"),
            }
        }

        for slot in ColorSlot::ALL {
            let Some(key) = color_key(slot) else { continue };
            if let Some(value) = get(key) {
                let value = value.trim();
                if is_valid_color(value) {
                    theme.colors.set(slot, value);
                } else {
                    tracing::debug!(key = key.key(), value, "Stored color ignored");
                }
            }
        }

        if let Some(value) = get(SettingKey::ThemeBorderRadius) {
            match BorderRadius::from_str(value) {
                Ok(radius) => theme.border_radius = radius,
                Err(e) => tracing::debug!(error = %e, "Stored border radius ignored"),
            }
        }

        if let Some(value) = get(SettingKey::ThemeFontSize) {
            match FontSize::from_str(value) {
                Ok(size) => theme.font_size = size,
                Err(e) => tracing::debug!(error = %e, "Stored font size ignored"),
            }
        }

        if let Some(value) = get(SettingKey::ThemeFontFamily) {
            if is_valid_font_family(value) {
                theme.font_family = value.trim().to_string();
            } else {
                tracing::debug!("Stored font family ignored");
            }
        }

        theme.animations = parse_bool(get(SettingKey::ThemeAnimations));
        theme.shadows = parse_bool(get(SettingKey::ThemeShadows));

        theme
    }

    /// Derive the render colors for a stored theme.
    ///
    /// - `light`: stored colors as-is.
    /// - `dark`: dark palette, with explicit overrides layered on top.
    /// - `auto`: the palette matching `system_prefers_dark`, with explicit
    ///   overrides layered on top.
    pub fn effective(stored: &ThemeConfig, system_prefers_dark: bool) -> ThemeConfig {
        let base = match stored.mode {
            ThemeMode::Light => None,
            ThemeMode::Dark => Some(ThemeColors::dark()),
            ThemeMode::Auto if system_prefers_dark => Some(ThemeColors::dark()),
            ThemeMode::Auto => Some(ThemeColors::light()),
        };

        let mut effective = stored.clone();
        if let Some(mut colors) = base {
            for slot in stored.colors.explicit_overrides() {
                colors.set(slot, stored.colors.get(slot));
            }
            effective.colors = colors;
        }
        effective
    }

    /// Overlay raw maintenance settings onto the defaults.
    pub fn resolve_maintenance(raw: &RawSettings) -> MaintenanceConfig {
        let mut config = MaintenanceConfig::default();
        let get = |key: SettingKey| raw.get(key.key()).map(String::as_str);

        config.enabled = get(SettingKey::MaintenanceEnabled) == Some("true");

        if let Some(value) = get(SettingKey::MaintenanceMode) {
            match MaintenanceMode::from_str(value) {
                Ok(mode) => config.mode = mode,
                Err(e) => tracing::debug!(error = %e, "Stored maintenance mode ignored"),
            }
        }

        if let Some(value) = get(SettingKey::MaintenanceExcludedPages) {
            match serde_json::from_str::<Vec<String>>(value) {
                Ok(pages) => {
                    config.excluded_pages = pages
                        .into_iter()
                        .map(|p| p.trim().to_string())
                        .filter(|p| match validate_page_prefix(p) {
                            Ok(()) => true,
                            Err(e) => {
                                tracing::debug!(error = %e, "Stored excluded page dropped");
                                false
                            }
                        })
                        .collect();
                }
                Err(e) => tracing::debug!(error = %e, "Stored excluded pages ignored"),
            }
        }

        if let Some(value) = get(SettingKey::MaintenanceMessage) {
            if value.len() <= MAX_MESSAGE_LEN {
                config.message = value.to_string();
            } else {
                tracing::debug!(len = value.len(), "Stored maintenance message ignored");
            }
        }
        if let Some(value) = get(SettingKey::MaintenanceEstimatedTime) {
            if value.len() <= MAX_ESTIMATED_TIME_LEN {
                config.estimated_time = value.to_string();
            } else {
                tracing::debug!(len = value.len(), "Stored estimated time ignored");
            }
        }

        config.allow_admin_access = parse_bool(get(SettingKey::MaintenanceAllowAdmin));

        config
    }
}

fn color_key(slot: ColorSlot) -> Option<SettingKey> {
    crate::schema::THEME_KEYS
        .into_iter()
        .find(|k| k.color_slot() == Some(slot))
}

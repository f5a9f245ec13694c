//! Enumerated settings-store schema.
//!
//! Every persisted field has exactly one [`SettingKey`]. Mapping a config to
//! store entries is an exhaustive match over the enum, so adding a field
//! without a key (or a key without a serializer) fails to compile.

use serde::{Deserialize, Serialize};

use crate::maintenance::MaintenanceConfig;
use crate::theme::{ColorSlot, ThemeConfig};

/// Literal stored for `true` booleans.
pub const TRUE_VALUE: &str = "true";
/// Literal stored for `false` booleans. Only this exact string reads as false.
pub const FALSE_VALUE: &str = "false";

/// Which config object a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Theme,
    Maintenance,
}

/// Every key the engine reads from or writes to the settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    ThemeMode,
    ThemePrimaryColor,
    ThemeSecondaryColor,
    ThemeAccentColor,
    ThemeBackground,
    ThemeSurface,
    ThemeText,
    ThemeTextSecondary,
    ThemeBorder,
    ThemeSuccess,
    ThemeWarning,
    ThemeError,
    ThemeInfo,
    ThemeBorderRadius,
    ThemeFontSize,
    ThemeFontFamily,
    ThemeAnimations,
    ThemeShadows,
    MaintenanceEnabled,
    MaintenanceMode,
    MaintenanceExcludedPages,
    MaintenanceMessage,
    MaintenanceEstimatedTime,
    MaintenanceAllowAdmin,
}

/// Theme keys in load/save order.
pub const THEME_KEYS: [SettingKey; 18] = [
    SettingKey::ThemeMode,
    SettingKey::ThemePrimaryColor,
    SettingKey::ThemeSecondaryColor,
    SettingKey::ThemeAccentColor,
    SettingKey::ThemeBackground,
    SettingKey::ThemeSurface,
    SettingKey::ThemeText,
    SettingKey::ThemeTextSecondary,
    SettingKey::ThemeBorder,
    SettingKey::ThemeSuccess,
    SettingKey::ThemeWarning,
    SettingKey::ThemeError,
    SettingKey::ThemeInfo,
    SettingKey::ThemeBorderRadius,
    SettingKey::ThemeFontSize,
    SettingKey::ThemeFontFamily,
    SettingKey::ThemeAnimations,
    SettingKey::ThemeShadows,
];

/// Maintenance keys in load/save order.
pub const MAINTENANCE_KEYS: [SettingKey; 6] = [
    SettingKey::MaintenanceEnabled,
    SettingKey::MaintenanceMode,
    SettingKey::MaintenanceExcludedPages,
    SettingKey::MaintenanceMessage,
    SettingKey::MaintenanceEstimatedTime,
    SettingKey::MaintenanceAllowAdmin,
];

impl SettingKey {
    /// The store key string.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ThemeMode => "theme_mode",
            Self::ThemePrimaryColor => "theme_primary_color",
            Self::ThemeSecondaryColor => "theme_secondary_color",
            Self::ThemeAccentColor => "theme_accent_color",
            Self::ThemeBackground => "theme_background",
            Self::ThemeSurface => "theme_surface",
            Self::ThemeText => "theme_text",
            Self::ThemeTextSecondary => "theme_text_secondary",
            Self::ThemeBorder => "theme_border",
            Self::ThemeSuccess => "theme_success",
            Self::ThemeWarning => "theme_warning",
            Self::ThemeError => "theme_error",
            Self::ThemeInfo => "theme_info",
            Self::ThemeBorderRadius => "theme_border_radius",
            Self::ThemeFontSize => "theme_font_size",
            Self::ThemeFontFamily => "theme_font_family",
            Self::ThemeAnimations => "theme_animations",
            Self::ThemeShadows => "theme_shadows",
            Self::MaintenanceEnabled => "maintenance_enabled",
            Self::MaintenanceMode => "maintenance_mode",
            Self::MaintenanceExcludedPages => "maintenance_excluded_pages",
            Self::MaintenanceMessage => "maintenance_message",
            Self::MaintenanceEstimatedTime => "maintenance_estimated_time",
            Self::MaintenanceAllowAdmin => "maintenance_allow_admin",
        }
    }

    /// Look up a key by its store string.
    pub fn from_key(key: &str) -> Option<Self> {
        THEME_KEYS
            .iter()
            .chain(MAINTENANCE_KEYS.iter())
            .copied()
            .find(|k| k.key() == key)
    }

    pub fn section(&self) -> Section {
        match self {
            Self::MaintenanceEnabled
            | Self::MaintenanceMode
            | Self::MaintenanceExcludedPages
            | Self::MaintenanceMessage
            | Self::MaintenanceEstimatedTime
            | Self::MaintenanceAllowAdmin => Section::Maintenance,
            _ => Section::Theme,
        }
    }

    /// The color slot a theme color key stores, if any.
    pub fn color_slot(&self) -> Option<ColorSlot> {
        match self {
            Self::ThemePrimaryColor => Some(ColorSlot::Primary),
            Self::ThemeSecondaryColor => Some(ColorSlot::Secondary),
            Self::ThemeAccentColor => Some(ColorSlot::Accent),
            Self::ThemeBackground => Some(ColorSlot::Background),
            Self::ThemeSurface => Some(ColorSlot::Surface),
            Self::ThemeText => Some(ColorSlot::Text),
            Self::ThemeTextSecondary => Some(ColorSlot::TextSecondary),
            Self::ThemeBorder => Some(ColorSlot::Border),
            Self::ThemeSuccess => Some(ColorSlot::Success),
            Self::ThemeWarning => Some(ColorSlot::Warning),
            Self::ThemeError => Some(ColorSlot::Error),
            Self::ThemeInfo => Some(ColorSlot::Info),
            _ => None,
        }
    }

    /// Human-readable description stored alongside the value.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ThemeMode => "Theme color scheme (light, dark, auto)",
            Self::ThemePrimaryColor => "Primary brand color",
            Self::ThemeSecondaryColor => "Secondary color",
            Self::ThemeAccentColor => "Accent color",
            Self::ThemeBackground => "Page background color",
            Self::ThemeSurface => "Card and panel surface color",
            Self::ThemeText => "Primary text color",
            Self::ThemeTextSecondary => "Secondary text color",
            Self::ThemeBorder => "Border color",
            Self::ThemeSuccess => "Success state color",
            Self::ThemeWarning => "Warning state color",
            Self::ThemeError => "Error state color",
            Self::ThemeInfo => "Informational state color",
            Self::ThemeBorderRadius => "Corner radius (none, small, medium, large)",
            Self::ThemeFontSize => "Base font size (small, medium, large)",
            Self::ThemeFontFamily => "Font family stack",
            Self::ThemeAnimations => "Enable interface animations",
            Self::ThemeShadows => "Enable drop shadows",
            Self::MaintenanceEnabled => "Maintenance mode active",
            Self::MaintenanceMode => "Maintenance scope (full, partial)",
            Self::MaintenanceExcludedPages => "Path prefixes reachable during maintenance (JSON array)",
            Self::MaintenanceMessage => "Message shown on the maintenance page",
            Self::MaintenanceEstimatedTime => "Estimated completion shown on the maintenance page",
            Self::MaintenanceAllowAdmin => "Let administrators bypass maintenance",
        }
    }

    /// Whether the value may be exposed to anonymous visitors.
    ///
    /// Everything the front-end needs before sign-in is public; the admin
    /// bypass flag is not.
    pub fn is_public(&self) -> bool {
        !matches!(self, Self::MaintenanceAllowAdmin)
    }
}

/// One key/value pair with its store metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_public: bool,
}

impl SettingEntry {
    pub fn new(key: SettingKey, value: impl Into<String>) -> Self {
        Self {
            key: key.key().to_string(),
            value: value.into(),
            description: Some(key.description().to_string()),
            is_public: key.is_public(),
        }
    }
}

pub fn bool_value(flag: bool) -> &'static str {
    if flag {
        TRUE_VALUE
    } else {
        FALSE_VALUE
    }
}

/// Read a stored boolean: false only for the exact literal `"false"`.
pub fn parse_bool(value: Option<&str>) -> bool {
    value != Some(FALSE_VALUE)
}

/// Stored value of a theme key, or `None` for keys outside the theme section.
pub fn theme_value(theme: &ThemeConfig, key: SettingKey) -> Option<String> {
    let value = match key {
        SettingKey::ThemeMode => theme.mode.as_str().to_string(),
        SettingKey::ThemePrimaryColor
        | SettingKey::ThemeSecondaryColor
        | SettingKey::ThemeAccentColor
        | SettingKey::ThemeBackground
        | SettingKey::ThemeSurface
        | SettingKey::ThemeText
        | SettingKey::ThemeTextSecondary
        | SettingKey::ThemeBorder
        | SettingKey::ThemeSuccess
        | SettingKey::ThemeWarning
        | SettingKey::ThemeError
        | SettingKey::ThemeInfo => theme.colors.get(key.color_slot()?).to_string(),
        SettingKey::ThemeBorderRadius => theme.border_radius.as_str().to_string(),
        SettingKey::ThemeFontSize => theme.font_size.as_str().to_string(),
        SettingKey::ThemeFontFamily => theme.font_family.clone(),
        SettingKey::ThemeAnimations => bool_value(theme.animations).to_string(),
        SettingKey::ThemeShadows => bool_value(theme.shadows).to_string(),
        SettingKey::MaintenanceEnabled
        | SettingKey::MaintenanceMode
        | SettingKey::MaintenanceExcludedPages
        | SettingKey::MaintenanceMessage
        | SettingKey::MaintenanceEstimatedTime
        | SettingKey::MaintenanceAllowAdmin => return None,
    };
    Some(value)
}

/// Stored value of a maintenance key, or `None` for theme keys.
pub fn maintenance_value(config: &MaintenanceConfig, key: SettingKey) -> Option<String> {
    let value = match key {
        SettingKey::MaintenanceEnabled => bool_value(config.enabled).to_string(),
        SettingKey::MaintenanceMode => config.mode.as_str().to_string(),
        SettingKey::MaintenanceExcludedPages => serde_json::to_string(&config.excluded_pages).ok()?,
        SettingKey::MaintenanceMessage => config.message.clone(),
        SettingKey::MaintenanceEstimatedTime => config.estimated_time.clone(),
        SettingKey::MaintenanceAllowAdmin => bool_value(config.allow_admin_access).to_string(),
        SettingKey::ThemeMode
        | SettingKey::ThemePrimaryColor
        | SettingKey::ThemeSecondaryColor
        | SettingKey::ThemeAccentColor
        | SettingKey::ThemeBackground
        | SettingKey::ThemeSurface
        | SettingKey::ThemeText
        | SettingKey::ThemeTextSecondary
        | SettingKey::ThemeBorder
        | SettingKey::ThemeSuccess
        | SettingKey::ThemeWarning
        | SettingKey::ThemeError
        | SettingKey::ThemeInfo
        | SettingKey::ThemeBorderRadius
        | SettingKey::ThemeFontSize
        | SettingKey::ThemeFontFamily
        | SettingKey::ThemeAnimations
        | SettingKey::ThemeShadows => return None,
    };
    Some(value)
}

/// Serialize a theme into one entry per key.
pub fn theme_entries(theme: &ThemeConfig) -> Vec<SettingEntry> {
    THEME_KEYS
        .iter()
        .filter_map(|key| theme_value(theme, *key).map(|value| SettingEntry::new(*key, value)))
        .collect()
}

/// Serialize a maintenance config into one entry per key.
pub fn maintenance_entries(config: &MaintenanceConfig) -> Vec<SettingEntry> {
    MAINTENANCE_KEYS
        .iter()
        .filter_map(|key| {
            maintenance_value(config, *key).map(|value| SettingEntry::new(*key, value))
        })
        .collect()
}

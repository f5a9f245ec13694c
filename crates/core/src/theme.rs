//! Theme data model: color slots, palettes, enums, and partial updates.
//!
//! [`ThemeConfig`] is the stored preference an administrator edits. The
//! effective render colors are derived from it by
//! [`crate::resolver::ThemeResolver::effective`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MODE_LIGHT: &str = "light";
pub const MODE_DARK: &str = "dark";
pub const MODE_AUTO: &str = "auto";

/// All valid theme modes.
pub const VALID_MODES: &[&str] = &[MODE_LIGHT, MODE_DARK, MODE_AUTO];

pub const RADIUS_NONE: &str = "none";
pub const RADIUS_SMALL: &str = "small";
pub const RADIUS_MEDIUM: &str = "medium";
pub const RADIUS_LARGE: &str = "large";

/// All valid border radius sizes.
pub const VALID_RADII: &[&str] = &[RADIUS_NONE, RADIUS_SMALL, RADIUS_MEDIUM, RADIUS_LARGE];

pub const FONT_SMALL: &str = "small";
pub const FONT_MEDIUM: &str = "medium";
pub const FONT_LARGE: &str = "large";

/// All valid base font sizes.
pub const VALID_FONT_SIZES: &[&str] = &[FONT_SMALL, FONT_MEDIUM, FONT_LARGE];

/// Default font stack.
pub const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

/// Maximum length of a font-family declaration.
pub const MAX_FONT_FAMILY_LEN: usize = 200;

/// Accepted CSS color syntaxes: hex (3, 4, 6 or 8 digits), functional
/// `rgb()/rgba()/hsl()/hsla()` notation, or a bare keyword such as `teal`.
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|(rgb|rgba|hsl|hsla)\([0-9.,%\s/a-z]+\)|[a-zA-Z]+)$",
    )
    .expect("valid regex")
});

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Stored color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Auto,
}

impl ThemeMode {
    /// Return the stored string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => MODE_LIGHT,
            Self::Dark => MODE_DARK,
            Self::Auto => MODE_AUTO,
        }
    }

    /// Parse from a string, returning an error for unknown modes.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            MODE_LIGHT => Ok(Self::Light),
            MODE_DARK => Ok(Self::Dark),
            MODE_AUTO => Ok(Self::Auto),
            other => Err(CoreError::Validation(format!(
                "Unknown theme mode: '{other}'. Valid modes: {}",
                VALID_MODES.join(", ")
            ))),
        }
    }
}

/// Corner rounding applied to surfaces and controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderRadius {
    None,
    Small,
    #[default]
    Medium,
    Large,
}

impl BorderRadius {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => RADIUS_NONE,
            Self::Small => RADIUS_SMALL,
            Self::Medium => RADIUS_MEDIUM,
            Self::Large => RADIUS_LARGE,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            RADIUS_NONE => Ok(Self::None),
            RADIUS_SMALL => Ok(Self::Small),
            RADIUS_MEDIUM => Ok(Self::Medium),
            RADIUS_LARGE => Ok(Self::Large),
            other => Err(CoreError::Validation(format!(
                "Unknown border radius: '{other}'. Valid values: {}",
                VALID_RADII.join(", ")
            ))),
        }
    }

    /// Pixel value published as the `--border-radius` token.
    pub fn px(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Small => 4,
            Self::Medium => 8,
            Self::Large => 16,
        }
    }
}

/// Base font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => FONT_SMALL,
            Self::Medium => FONT_MEDIUM,
            Self::Large => FONT_LARGE,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            FONT_SMALL => Ok(Self::Small),
            FONT_MEDIUM => Ok(Self::Medium),
            FONT_LARGE => Ok(Self::Large),
            other => Err(CoreError::Validation(format!(
                "Unknown font size: '{other}'. Valid values: {}",
                VALID_FONT_SIZES.join(", ")
            ))),
        }
    }

    /// Pixel value published as the `--font-size-base` token.
    pub fn px(&self) -> u32 {
        match self {
            Self::Small => 14,
            Self::Medium => 16,
            Self::Large => 18,
        }
    }
}

// ---------------------------------------------------------------------------
// Color slots
// ---------------------------------------------------------------------------

/// One of the twelve named color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Primary,
    Secondary,
    Accent,
    Background,
    Surface,
    Text,
    TextSecondary,
    Border,
    Success,
    Warning,
    Error,
    Info,
}

impl ColorSlot {
    /// Every slot, in display order. Palette arrays are indexed in this order.
    pub const ALL: [ColorSlot; 12] = [
        Self::Primary,
        Self::Secondary,
        Self::Accent,
        Self::Background,
        Self::Surface,
        Self::Text,
        Self::TextSecondary,
        Self::Border,
        Self::Success,
        Self::Warning,
        Self::Error,
        Self::Info,
    ];

    /// Field name in the in-memory and exported shape.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Background => "background",
            Self::Surface => "surface",
            Self::Text => "text",
            Self::TextSecondary => "textSecondary",
            Self::Border => "border",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Design token published by the presenter.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Primary => "--color-primary",
            Self::Secondary => "--color-secondary",
            Self::Accent => "--color-accent",
            Self::Background => "--color-background",
            Self::Surface => "--color-surface",
            Self::Text => "--color-text",
            Self::TextSecondary => "--color-text-secondary",
            Self::Border => "--color-border",
            Self::Success => "--color-success",
            Self::Warning => "--color-warning",
            Self::Error => "--color-error",
            Self::Info => "--color-info",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Palette literal, indexed by [`ColorSlot::ALL`] order.
pub type Palette = [&'static str; 12];

/// Built-in light palette. Default for stored colors.
pub const LIGHT_PALETTE: Palette = [
    "#3b82f6", // primary
    "#64748b", // secondary
    "#8b5cf6", // accent
    "#ffffff", // background
    "#f8fafc", // surface
    "#1e293b", // text
    "#475569", // textSecondary
    "#e2e8f0", // border
    "#10b981", // success
    "#f59e0b", // warning
    "#ef4444", // error
    "#0ea5e9", // info
];

/// Built-in dark palette.
pub const DARK_PALETTE: Palette = [
    "#60a5fa", // primary
    "#94a3b8", // secondary
    "#a78bfa", // accent
    "#0f172a", // background
    "#1e293b", // surface
    "#f1f5f9", // text
    "#cbd5e1", // textSecondary
    "#334155", // border
    "#34d399", // success
    "#fbbf24", // warning
    "#f87171", // error
    "#38bdf8", // info
];

/// Check that a font-family declaration is non-empty, bounded, and cannot
/// break out of a CSS declaration.
pub fn is_valid_font_family(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed.len() <= MAX_FONT_FAMILY_LEN
        && !trimmed.contains(['{', '}', ';', '<', '>'])
}

/// Check that a color value is non-empty and uses a recognised CSS syntax.
pub fn is_valid_color(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && COLOR_RE.is_match(trimmed)
}

// ---------------------------------------------------------------------------
// ThemeColors
// ---------------------------------------------------------------------------

/// The twelve color slots of a theme. Every slot is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_secondary: String,
    pub border: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
}

impl ThemeColors {
    /// Build a full color set from a palette literal.
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            primary: palette[ColorSlot::Primary.index()].to_string(),
            secondary: palette[ColorSlot::Secondary.index()].to_string(),
            accent: palette[ColorSlot::Accent.index()].to_string(),
            background: palette[ColorSlot::Background.index()].to_string(),
            surface: palette[ColorSlot::Surface.index()].to_string(),
            text: palette[ColorSlot::Text.index()].to_string(),
            text_secondary: palette[ColorSlot::TextSecondary.index()].to_string(),
            border: palette[ColorSlot::Border.index()].to_string(),
            success: palette[ColorSlot::Success.index()].to_string(),
            warning: palette[ColorSlot::Warning.index()].to_string(),
            error: palette[ColorSlot::Error.index()].to_string(),
            info: palette[ColorSlot::Info.index()].to_string(),
        }
    }

    pub fn light() -> Self {
        Self::from_palette(&LIGHT_PALETTE)
    }

    pub fn dark() -> Self {
        Self::from_palette(&DARK_PALETTE)
    }

    pub fn get(&self, slot: ColorSlot) -> &str {
        match slot {
            ColorSlot::Primary => &self.primary,
            ColorSlot::Secondary => &self.secondary,
            ColorSlot::Accent => &self.accent,
            ColorSlot::Background => &self.background,
            ColorSlot::Surface => &self.surface,
            ColorSlot::Text => &self.text,
            ColorSlot::TextSecondary => &self.text_secondary,
            ColorSlot::Border => &self.border,
            ColorSlot::Success => &self.success,
            ColorSlot::Warning => &self.warning,
            ColorSlot::Error => &self.error,
            ColorSlot::Info => &self.info,
        }
    }

    pub fn set(&mut self, slot: ColorSlot, value: impl Into<String>) {
        let value = value.into();
        match slot {
            ColorSlot::Primary => self.primary = value,
            ColorSlot::Secondary => self.secondary = value,
            ColorSlot::Accent => self.accent = value,
            ColorSlot::Background => self.background = value,
            ColorSlot::Surface => self.surface = value,
            ColorSlot::Text => self.text = value,
            ColorSlot::TextSecondary => self.text_secondary = value,
            ColorSlot::Border => self.border = value,
            ColorSlot::Success => self.success = value,
            ColorSlot::Warning => self.warning = value,
            ColorSlot::Error => self.error = value,
            ColorSlot::Info => self.info = value,
        }
    }

    /// Slots whose value differs from the light palette default.
    ///
    /// The stored color set is always complete, so a slot counts as an
    /// explicit override exactly when it no longer holds the built-in value.
    pub fn explicit_overrides(&self) -> Vec<ColorSlot> {
        ColorSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot) != LIGHT_PALETTE[slot.index()])
            .collect()
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::light()
    }
}

// ---------------------------------------------------------------------------
// ThemeConfig
// ---------------------------------------------------------------------------

/// A complete, validated theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub mode: ThemeMode,
    pub colors: ThemeColors,
    pub border_radius: BorderRadius,
    pub font_size: FontSize,
    pub font_family: String,
    pub animations: bool,
    pub shadows: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            mode: ThemeMode::default(),
            colors: ThemeColors::default(),
            border_radius: BorderRadius::default(),
            font_size: FontSize::default(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            animations: true,
            shadows: true,
        }
    }
}

impl ThemeConfig {
    /// Validate every field of a complete theme.
    pub fn validate(&self) -> Result<(), CoreError> {
        for slot in ColorSlot::ALL {
            let value = self.colors.get(slot);
            if !is_valid_color(value) {
                return Err(CoreError::Validation(format!(
                    "Invalid color for '{}': '{value}'",
                    slot.name()
                )));
            }
        }
        if !is_valid_font_family(&self.font_family) {
            return Err(CoreError::Validation(format!(
                "Font family must be non-empty, at most {MAX_FONT_FAMILY_LEN} characters, \
                 and must not contain any of {{ }} ; < >"
            )));
        }
        Ok(())
    }

    /// Merge a partial update into a copy of this theme and validate the
    /// result. `self` is never modified.
    pub fn apply_patch(&self, patch: &ThemePatch) -> Result<ThemeConfig, CoreError> {
        let mut next = self.clone();
        if let Some(mode) = patch.mode {
            next.mode = mode;
        }
        if let Some(colors) = &patch.colors {
            for slot in ColorSlot::ALL {
                if let Some(value) = colors.get(slot) {
                    next.colors.set(slot, value.trim());
                }
            }
        }
        if let Some(radius) = patch.border_radius {
            next.border_radius = radius;
        }
        if let Some(size) = patch.font_size {
            next.font_size = size;
        }
        if let Some(family) = &patch.font_family {
            next.font_family = family.trim().to_string();
        }
        if let Some(animations) = patch.animations {
            next.animations = animations;
        }
        if let Some(shadows) = patch.shadows {
            next.shadows = shadows;
        }
        next.validate()?;
        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// Partial color update. Absent slots keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeColorsPatch {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub background: Option<String>,
    pub surface: Option<String>,
    pub text: Option<String>,
    pub text_secondary: Option<String>,
    pub border: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
}

impl ThemeColorsPatch {
    pub fn get(&self, slot: ColorSlot) -> Option<&str> {
        let value = match slot {
            ColorSlot::Primary => &self.primary,
            ColorSlot::Secondary => &self.secondary,
            ColorSlot::Accent => &self.accent,
            ColorSlot::Background => &self.background,
            ColorSlot::Surface => &self.surface,
            ColorSlot::Text => &self.text,
            ColorSlot::TextSecondary => &self.text_secondary,
            ColorSlot::Border => &self.border,
            ColorSlot::Success => &self.success,
            ColorSlot::Warning => &self.warning,
            ColorSlot::Error => &self.error,
            ColorSlot::Info => &self.info,
        };
        value.as_deref()
    }
}

/// Partial theme update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemePatch {
    pub mode: Option<ThemeMode>,
    pub colors: Option<ThemeColorsPatch>,
    pub border_radius: Option<BorderRadius>,
    pub font_size: Option<FontSize>,
    pub font_family: Option<String>,
    pub animations: Option<bool>,
    pub shadows: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_str_valid_and_invalid() {
        assert_eq!(ThemeMode::from_str("auto").unwrap(), ThemeMode::Auto);
        assert_eq!(ThemeMode::from_str("dark").unwrap(), ThemeMode::Dark);
        assert!(ThemeMode::from_str("Dark").is_err());
        assert!(ThemeMode::from_str("").is_err());
    }

    #[test]
    fn radius_pixels() {
        assert_eq!(BorderRadius::None.px(), 0);
        assert_eq!(BorderRadius::Small.px(), 4);
        assert_eq!(BorderRadius::Medium.px(), 8);
        assert_eq!(BorderRadius::Large.px(), 16);
        assert!(BorderRadius::from_str("huge").is_err());
    }

    #[test]
    fn font_size_pixels() {
        assert_eq!(FontSize::Small.px(), 14);
        assert_eq!(FontSize::Medium.px(), 16);
        assert_eq!(FontSize::Large.px(), 18);
    }

    #[test]
    fn palettes_differ_in_every_slot() {
        for slot in ColorSlot::ALL {
            assert_ne!(
                ThemeColors::light().get(slot),
                ThemeColors::dark().get(slot),
                "slot {} should differ",
                slot.name()
            );
        }
    }

    #[test]
    fn color_validation() {
        assert!(is_valid_color("#fff"));
        assert!(is_valid_color("#1e293b"));
        assert!(is_valid_color("#1e293bcc"));
        assert!(is_valid_color("rgb(10, 20, 30)"));
        assert!(is_valid_color("hsl(210 40% 50% / 0.5)"));
        assert!(is_valid_color("teal"));
        assert!(!is_valid_color(""));
        assert!(!is_valid_color("   "));
        assert!(!is_valid_color("#12345"));
        assert!(!is_valid_color("url(javascript:alert(1))"));
        assert!(!is_valid_color("red; background: blue"));
    }

    #[test]
    fn explicit_overrides_on_defaults_is_empty() {
        assert!(ThemeColors::light().explicit_overrides().is_empty());
    }

    #[test]
    fn explicit_overrides_detects_changed_slot() {
        let mut colors = ThemeColors::light();
        colors.set(ColorSlot::Accent, "#ff00aa");
        assert_eq!(colors.explicit_overrides(), vec![ColorSlot::Accent]);
    }

    #[test]
    fn apply_patch_merges_and_keeps_original() {
        let base = ThemeConfig::default();
        let patch = ThemePatch {
            mode: Some(ThemeMode::Dark),
            colors: Some(ThemeColorsPatch {
                primary: Some(" #112233 ".to_string()),
                ..Default::default()
            }),
            animations: Some(false),
            ..Default::default()
        };

        let next = base.apply_patch(&patch).unwrap();

        assert_eq!(next.mode, ThemeMode::Dark);
        assert_eq!(next.colors.primary, "#112233");
        assert_eq!(next.colors.secondary, LIGHT_PALETTE[1]);
        assert!(!next.animations);
        assert!(next.shadows);
        assert_eq!(base, ThemeConfig::default());
    }

    #[test]
    fn apply_patch_rejects_bad_color() {
        let patch = ThemePatch {
            colors: Some(ThemeColorsPatch {
                border: Some("not a color!".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(ThemeConfig::default().apply_patch(&patch).is_err());
    }

    #[test]
    fn apply_patch_rejects_empty_font_family() {
        let patch = ThemePatch {
            font_family: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(ThemeConfig::default().apply_patch(&patch).is_err());
    }

    #[test]
    fn font_family_validation() {
        assert!(is_valid_font_family("Inter, system-ui, sans-serif"));
        assert!(is_valid_font_family("\"Open Sans\", Arial"));
        assert!(!is_valid_font_family(""));
        assert!(!is_valid_font_family("Arial; } body { display: none"));
        assert!(!is_valid_font_family(&"a".repeat(MAX_FONT_FAMILY_LEN + 1)));
    }

    #[test]
    fn theme_serializes_camel_case() {
        let json = serde_json::to_value(ThemeConfig::default()).unwrap();
        assert_eq!(json["mode"], "light");
        assert_eq!(json["borderRadius"], "medium");
        assert_eq!(json["fontSize"], "medium");
        assert_eq!(json["colors"]["textSecondary"], LIGHT_PALETTE[6]);
    }
}

//! Maintenance-mode configuration and its partial update.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAINTENANCE_FULL: &str = "full";
pub const MAINTENANCE_PARTIAL: &str = "partial";

/// All valid maintenance modes.
pub const VALID_MAINTENANCE_MODES: &[&str] = &[MAINTENANCE_FULL, MAINTENANCE_PARTIAL];

/// Message shown on the placeholder when none has been configured.
pub const DEFAULT_MESSAGE: &str =
    "We are currently performing scheduled maintenance. Please check back soon.";

/// Maximum length for the placeholder message.
pub const MAX_MESSAGE_LEN: usize = 2_000;

/// Maximum length for the estimated-time text.
pub const MAX_ESTIMATED_TIME_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceMode {
    #[default]
    Full,
    Partial,
}

impl MaintenanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => MAINTENANCE_FULL,
            Self::Partial => MAINTENANCE_PARTIAL,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            MAINTENANCE_FULL => Ok(Self::Full),
            MAINTENANCE_PARTIAL => Ok(Self::Partial),
            other => Err(CoreError::Validation(format!(
                "Unknown maintenance mode: '{other}'. Valid modes: {}",
                VALID_MAINTENANCE_MODES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// MaintenanceConfig
// ---------------------------------------------------------------------------

/// Site-wide maintenance state.
///
/// `excluded_pages` keeps the administrator's order; duplicates are allowed
/// and simply redundant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceConfig {
    pub enabled: bool,
    pub mode: MaintenanceMode,
    pub excluded_pages: Vec<String>,
    pub message: String,
    pub estimated_time: String,
    pub allow_admin_access: bool,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: MaintenanceMode::default(),
            excluded_pages: Vec::new(),
            message: DEFAULT_MESSAGE.to_string(),
            estimated_time: String::new(),
            allow_admin_access: true,
        }
    }
}

/// Validate that an excluded page prefix is non-empty and starts with `/`.
pub fn validate_page_prefix(prefix: &str) -> Result<(), CoreError> {
    if prefix.is_empty() {
        return Err(CoreError::Validation(
            "Excluded page must not be empty".to_string(),
        ));
    }
    if !prefix.starts_with('/') {
        return Err(CoreError::Validation(format!(
            "Excluded page '{prefix}' must start with '/'"
        )));
    }
    Ok(())
}

impl MaintenanceConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        for page in &self.excluded_pages {
            validate_page_prefix(page)?;
        }
        if self.message.len() > MAX_MESSAGE_LEN {
            return Err(CoreError::Validation(format!(
                "Message exceeds maximum length of {MAX_MESSAGE_LEN} characters"
            )));
        }
        if self.estimated_time.len() > MAX_ESTIMATED_TIME_LEN {
            return Err(CoreError::Validation(format!(
                "Estimated time exceeds maximum length of {MAX_ESTIMATED_TIME_LEN} characters"
            )));
        }
        Ok(())
    }

    /// Merge a partial update into a copy and validate the result.
    pub fn apply_patch(&self, patch: &MaintenancePatch) -> Result<MaintenanceConfig, CoreError> {
        let mut next = self.clone();
        if let Some(enabled) = patch.enabled {
            next.enabled = enabled;
        }
        if let Some(mode) = patch.mode {
            next.mode = mode;
        }
        if let Some(pages) = &patch.excluded_pages {
            next.excluded_pages = pages.iter().map(|p| p.trim().to_string()).collect();
        }
        if let Some(message) = &patch.message {
            next.message = message.clone();
        }
        if let Some(estimated_time) = &patch.estimated_time {
            next.estimated_time = estimated_time.clone();
        }
        if let Some(allow) = patch.allow_admin_access {
            next.allow_admin_access = allow;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial maintenance update. Absent fields keep their current value;
/// `excluded_pages` replaces the whole list when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaintenancePatch {
    pub enabled: Option<bool>,
    pub mode: Option<MaintenanceMode>,
    pub excluded_pages: Option<Vec<String>>,
    pub message: Option<String>,
    pub estimated_time: Option<String>,
    pub allow_admin_access: Option<bool>,
}

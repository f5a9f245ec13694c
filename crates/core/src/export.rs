//! Portable export/import blob.
//!
//! The blob is pretty-printed JSON with exactly two top-level sections,
//! `theme` and `maintenance`, in the in-memory (camelCase) shape. Field order
//! follows the struct declarations, so re-exporting an unchanged config
//! produces an identical, diffable document.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::maintenance::{MaintenanceConfig, MaintenancePatch};
use crate::theme::{ThemeConfig, ThemePatch};

pub const SECTION_THEME: &str = "theme";
pub const SECTION_MAINTENANCE: &str = "maintenance";

#[derive(Debug, Serialize)]
struct ExportBlob<'a> {
    theme: &'a ThemeConfig,
    maintenance: &'a MaintenanceConfig,
}

/// Sections found in an import blob. Absent sections are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportBundle {
    #[serde(default)]
    pub theme: Option<ThemePatch>,
    #[serde(default)]
    pub maintenance: Option<MaintenancePatch>,
}

impl ImportBundle {
    /// Names of the sections present, in blob order.
    pub fn sections(&self) -> Vec<&'static str> {
        let mut sections = Vec::new();
        if self.theme.is_some() {
            sections.push(SECTION_THEME);
        }
        if self.maintenance.is_some() {
            sections.push(SECTION_MAINTENANCE);
        }
        sections
    }
}

/// Serialize both configs into the export blob.
pub fn export_blob(
    theme: &ThemeConfig,
    maintenance: &MaintenanceConfig,
) -> Result<String, CoreError> {
    serde_json::to_string_pretty(&ExportBlob { theme, maintenance })
        .map_err(|e| CoreError::Internal(format!("Failed to serialize export: {e}")))
}

/// Parse an import blob.
///
/// Fails with [`CoreError::Format`] when the blob is not a JSON object or a
/// present section has the wrong shape. Unknown top-level keys are ignored.
pub fn parse_import(blob: &str) -> Result<ImportBundle, CoreError> {
    let value: serde_json::Value =
        serde_json::from_str(blob).map_err(|e| CoreError::Format(e.to_string()))?;
    if !value.is_object() {
        return Err(CoreError::Format(
            "Expected a JSON object with 'theme' and/or 'maintenance' sections".to_string(),
        ));
    }
    for section in [SECTION_THEME, SECTION_MAINTENANCE] {
        if let Some(v) = value.get(section) {
            if !v.is_object() {
                return Err(CoreError::Format(format!(
                    "Section '{section}' must be an object"
                )));
            }
        }
    }
    serde_json::from_value(value).map_err(|e| CoreError::Format(e.to_string()))
}

//! Mapping between config objects and the settings store.
//!
//! Writes are best-effort and non-transactional: every key is attempted even
//! when an earlier one fails, and failures are reported rather than retried.

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::maintenance::MaintenanceConfig;
use crate::schema::{
    maintenance_entries, theme_entries, Section, SettingEntry, SettingKey, MAINTENANCE_KEYS,
    THEME_KEYS,
};
use crate::store::SettingsStore;
use crate::theme::ThemeConfig;
use crate::types::RawSettings;

/// Raw stored values split by section. Absent keys are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSettingsBundle {
    pub theme: RawSettings,
    pub maintenance: RawSettings,
}

/// Outcome of writing one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    /// Keys that were written.
    pub written: Vec<String>,
    /// Keys that failed, with the store's error message.
    pub failed: Vec<(String, String)>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Loads and saves config sections through a [`SettingsStore`].
#[derive(Clone)]
pub struct ConfigPersistence {
    store: Arc<dyn SettingsStore>,
}

impl ConfigPersistence {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Fetch every known theme and maintenance key.
    pub async fn load(&self) -> Result<RawSettingsBundle, CoreError> {
        let keys: Vec<&str> = THEME_KEYS
            .iter()
            .chain(MAINTENANCE_KEYS.iter())
            .map(|k| k.key())
            .collect();

        let raw = self.store.get_many(&keys).await.map_err(|e| match e {
            CoreError::Load(msg) => CoreError::Load(msg),
            other => CoreError::Load(other.to_string()),
        })?;

        let mut bundle = RawSettingsBundle::default();
        for (key, value) in raw {
            let Some(setting) = SettingKey::from_key(&key) else {
                tracing::debug!(key = %key, "Unknown setting returned by store ignored");
                continue;
            };
            let section = match setting.section() {
                Section::Theme => &mut bundle.theme,
                Section::Maintenance => &mut bundle.maintenance,
            };
            section.insert(key, value);
        }

        tracing::debug!(
            theme_keys = bundle.theme.len(),
            maintenance_keys = bundle.maintenance.len(),
            "Site settings loaded",
        );
        Ok(bundle)
    }

    pub async fn save_theme(&self, theme: &ThemeConfig) -> SaveReport {
        self.write_all(theme_entries(theme)).await
    }

    pub async fn save_maintenance(&self, config: &MaintenanceConfig) -> SaveReport {
        self.write_all(maintenance_entries(config)).await
    }

    async fn write_all(&self, entries: Vec<SettingEntry>) -> SaveReport {
        let mut report = SaveReport::default();
        for entry in entries {
            match self.store.upsert(&entry).await {
                Ok(()) => report.written.push(entry.key),
                Err(e) => {
                    tracing::warn!(key = %entry.key, error = %e, "Setting write failed");
                    report.failed.push((entry.key, e.to_string()));
                }
            }
        }
        if !report.is_complete() {
            tracing::warn!(
                written = report.written.len(),
                failed = report.failed.len(),
                "Settings saved partially; store and memory may differ",
            );
        }
        report
    }
}

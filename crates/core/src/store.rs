//! The settings store seam.
//!
//! The engine only needs "fetch these keys" and "upsert this entry". The
//! PostgreSQL implementation lives in `kindred-db`; [`MemorySettingsStore`]
//! backs tests and local runs without a database.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::schema::SettingEntry;
use crate::types::RawSettings;

/// Remote key/value settings table.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the given keys. Keys with no stored row are omitted.
    async fn get_many(&self, keys: &[&str]) -> Result<RawSettings, CoreError>;

    /// Insert or overwrite a single entry.
    async fn upsert(&self, entry: &SettingEntry) -> Result<(), CoreError>;
}

/// In-process store holding entries in a mutex-guarded map.
///
/// Keys registered through [`MemorySettingsStore::fail_writes_for`] reject
/// upserts, and [`MemorySettingsStore::fail_reads`] makes every fetch fail,
/// which lets callers exercise the degraded paths.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    entries: Mutex<HashMap<String, SettingEntry>>,
    failing_keys: Mutex<HashSet<String>>,
    fail_reads: Mutex<bool>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw `key -> value` pairs.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = values
            .into_iter()
            .map(|(k, v)| {
                let key = k.into();
                let entry = SettingEntry {
                    key: key.clone(),
                    value: v.into(),
                    description: None,
                    is_public: true,
                };
                (key, entry)
            })
            .collect();
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    pub fn fail_writes_for(&self, key: &str) {
        lock(&self.failing_keys).insert(key.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        *lock(&self.fail_reads) = fail;
    }

    /// Current value for a key, if stored.
    pub fn value(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).map(|e| e.value.clone())
    }

    /// Full stored entry for a key, if any.
    pub fn entry(&self, key: &str) -> Option<SettingEntry> {
        lock(&self.entries).get(key).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // A poisoned map is still structurally valid; keep serving it.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_many(&self, keys: &[&str]) -> Result<RawSettings, CoreError> {
        if *lock(&self.fail_reads) {
            return Err(CoreError::Load("settings store unavailable".to_string()));
        }
        let entries = lock(&self.entries);
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(*k).map(|e| (k.to_string(), e.value.clone())))
            .collect())
    }

    async fn upsert(&self, entry: &SettingEntry) -> Result<(), CoreError> {
        if lock(&self.failing_keys).contains(&entry.key) {
            return Err(CoreError::Save {
                key: entry.key.clone(),
                message: "write rejected".to_string(),
            });
        }
        lock(&self.entries).insert(entry.key.clone(), entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::schema::SettingKey;

    #[tokio::test]
    async fn get_many_omits_missing_keys() {
        let store = MemorySettingsStore::with_values([("theme_mode", "dark")]);
        let raw = store
            .get_many(&["theme_mode", "theme_font_size"])
            .await
            .unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw["theme_mode"], "dark");
    }

    #[tokio::test]
    async fn upsert_overwrites() {
        let store = MemorySettingsStore::with_values([("theme_mode", "dark")]);
        store
            .upsert(&SettingEntry::new(SettingKey::ThemeMode, "auto"))
            .await
            .unwrap();
        assert_eq!(store.value("theme_mode").as_deref(), Some("auto"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemorySettingsStore::new();
        store.fail_writes_for("theme_mode");
        store.fail_reads(true);

        let err = store
            .upsert(&SettingEntry::new(SettingKey::ThemeMode, "auto"))
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Save { ref key, .. } if key == "theme_mode");
        assert_matches!(store.get_many(&["theme_mode"]).await, Err(CoreError::Load(_)));
    }
}

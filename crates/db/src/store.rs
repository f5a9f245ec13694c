//! [`SettingsStore`] backed by the `site_settings` table.

use async_trait::async_trait;
use kindred_core::error::CoreError;
use kindred_core::schema::SettingEntry;
use kindred_core::store::SettingsStore;
use kindred_core::types::RawSettings;

use crate::repositories::SiteSettingRepo;
use crate::DbPool;

pub struct PgSettingsStore {
    pool: DbPool,
}

impl PgSettingsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get_many(&self, keys: &[&str]) -> Result<RawSettings, CoreError> {
        let rows = SiteSettingRepo::get_many(&self.pool, keys)
            .await
            .map_err(|e| CoreError::Load(e.to_string()))?;
        tracing::debug!(requested = keys.len(), found = rows.len(), "Fetched site settings");
        Ok(rows.into_iter().map(|row| (row.key, row.value)).collect())
    }

    async fn upsert(&self, entry: &SettingEntry) -> Result<(), CoreError> {
        SiteSettingRepo::upsert(&self.pool, entry)
            .await
            .map_err(|e| CoreError::Save {
                key: entry.key.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

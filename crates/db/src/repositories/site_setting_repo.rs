//! Repository for the `site_settings` key/value table.

use kindred_core::schema::SettingEntry;
use sqlx::PgPool;

use crate::models::site_setting::SiteSetting;

/// Column list for `site_settings` queries.
const COLUMNS: &str = "key, value, description, is_public, created_at, updated_at";

/// Provides data access for site settings.
pub struct SiteSettingRepo;

impl SiteSettingRepo {
    /// Fetch the rows for the given keys in a single query.
    ///
    /// Keys without a row are simply absent from the result.
    pub async fn get_many(pool: &PgPool, keys: &[&str]) -> Result<Vec<SiteSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_settings WHERE key = ANY($1) ORDER BY key");
        sqlx::query_as::<_, SiteSetting>(&query)
            .bind(keys)
            .fetch_all(pool)
            .await
    }

    /// Insert or overwrite a setting.
    ///
    /// Uses `ON CONFLICT (key) DO UPDATE` so repeated saves are idempotent.
    pub async fn upsert(pool: &PgPool, entry: &SettingEntry) -> Result<SiteSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_settings (key, value, description, is_public) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (key) DO UPDATE SET \
                 value = EXCLUDED.value, \
                 description = COALESCE(EXCLUDED.description, site_settings.description), \
                 is_public = EXCLUDED.is_public \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteSetting>(&query)
            .bind(&entry.key)
            .bind(&entry.value)
            .bind(&entry.description)
            .bind(entry.is_public)
            .fetch_one(pool)
            .await
    }
}

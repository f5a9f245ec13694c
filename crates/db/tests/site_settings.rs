//! Integration tests for the `site_settings` table.
//!
//! Exercises the repository and `PgSettingsStore` against a real database:
//! - Upsert overwrites and keeps `created_at`
//! - Batch fetch returns only present keys
//! - Saved theme resolves back; visibility follows the key schema

use kindred_core::persistence::ConfigPersistence;
use kindred_core::resolver::ThemeResolver;
use kindred_core::schema::{SettingEntry, SettingKey};
use kindred_core::store::SettingsStore;
use kindred_core::theme::{ThemeConfig, ThemeMode};
use kindred_db::repositories::SiteSettingRepo;
use kindred_db::PgSettingsStore;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_overwrites_existing_value(pool: PgPool) {
    kindred_db::health_check(&pool).await.unwrap();

    let first = SiteSettingRepo::upsert(&pool, &SettingEntry::new(SettingKey::ThemeMode, "dark"))
        .await
        .unwrap();
    assert_eq!(first.value, "dark");
    assert!(first.is_public);

    let second = SiteSettingRepo::upsert(&pool, &SettingEntry::new(SettingKey::ThemeMode, "auto"))
        .await
        .unwrap();
    assert_eq!(second.value, "auto");
    assert_eq!(second.created_at, first.created_at);

    let rows = SiteSettingRepo::get_many(&pool, &["theme_mode"]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, "auto");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_many_returns_only_present_keys(pool: PgPool) {
    let store = PgSettingsStore::new(pool);
    store
        .upsert(&SettingEntry::new(SettingKey::MaintenanceEnabled, "true"))
        .await
        .unwrap();

    let raw = store
        .get_many(&["maintenance_enabled", "maintenance_mode"])
        .await
        .unwrap();

    assert_eq!(raw.len(), 1);
    assert_eq!(raw["maintenance_enabled"], "true");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn saved_theme_loads_back(pool: PgPool) {
    let persistence = ConfigPersistence::new(Arc::new(PgSettingsStore::new(pool.clone())));
    let theme = ThemeConfig {
        mode: ThemeMode::Auto,
        font_family: "Georgia, serif".to_string(),
        shadows: false,
        ..Default::default()
    };

    let report = persistence.save_theme(&theme).await;
    assert!(report.is_complete());

    let bundle = persistence.load().await.unwrap();
    assert_eq!(ThemeResolver::resolve_stored(&bundle.theme), theme);

    let allow = SiteSettingRepo::upsert(
        &pool,
        &SettingEntry::new(SettingKey::MaintenanceAllowAdmin, "true"),
    )
    .await
    .unwrap();
    assert!(!allow.is_public);
}

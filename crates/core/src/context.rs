//! The process-wide configuration context.
//!
//! [`SiteConfigContext`] owns the only live copy of the theme and maintenance
//! configs. Readers get an immutable [`ConfigSnapshot`] behind an `Arc`;
//! writers go through the update methods, which replace the snapshot and
//! notify every subscriber before returning. Persistence then happens on a
//! spawned task (optimistic update): a failed write is logged and reported
//! through the returned [`PersistHandle`], never rolled back.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::CoreError;
use crate::export::{export_blob, parse_import};
use crate::maintenance::{MaintenanceConfig, MaintenancePatch};
use crate::persistence::{ConfigPersistence, SaveReport};
use crate::resolver::ThemeResolver;
use crate::store::SettingsStore;
use crate::theme::{ThemeConfig, ThemePatch};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One immutable, versioned view of the site configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    /// Incremented on every replacement.
    pub version: u64,
    /// `false` until the initial load has completed (successfully or not).
    pub ready: bool,
    pub theme: ThemeConfig,
    pub maintenance: MaintenanceConfig,
    pub updated_at: Timestamp,
}

impl ConfigSnapshot {
    fn initial() -> Self {
        Self {
            version: 0,
            ready: false,
            theme: ThemeConfig::default(),
            maintenance: MaintenanceConfig::default(),
            updated_at: Utc::now(),
        }
    }

    fn next(&self, theme: ThemeConfig, maintenance: MaintenanceConfig) -> Self {
        Self {
            version: self.version + 1,
            ready: true,
            theme,
            maintenance,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// System color-scheme signal
// ---------------------------------------------------------------------------

/// Live "system prefers dark" signal.
///
/// Subscribers are only woken when the value actually changes.
#[derive(Debug, Clone)]
pub struct ColorSchemeSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ColorSchemeSignal {
    pub fn new(prefers_dark: bool) -> Self {
        let (tx, _) = watch::channel(prefers_dark);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Publish a new value. Returns whether it changed.
    pub fn set(&self, prefers_dark: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == prefers_dark {
                false
            } else {
                *current = prefers_dark;
                true
            }
        });
        if changed {
            tracing::debug!(prefers_dark, "System color scheme changed");
        }
        changed
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Persist handle
// ---------------------------------------------------------------------------

/// Background write started by an update. Await it or drop it.
#[derive(Debug)]
pub struct PersistHandle {
    inner: JoinHandle<SaveReport>,
}

impl PersistHandle {
    /// Wait for the write to finish.
    pub async fn wait(self) -> SaveReport {
        match self.inner.await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Settings persistence task failed");
                SaveReport {
                    written: Vec::new(),
                    failed: vec![("*".to_string(), e.to_string())],
                }
            }
        }
    }
}

/// Result of an import: which sections were applied and their writes.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub sections: Vec<&'static str>,
    pub persist: Vec<PersistHandle>,
}

impl ImportOutcome {
    pub async fn wait(self) -> Vec<SaveReport> {
        let mut reports = Vec::with_capacity(self.persist.len());
        for handle in self.persist {
            reports.push(handle.wait().await);
        }
        reports
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Owner of the live site configuration.
pub struct SiteConfigContext {
    persistence: ConfigPersistence,
    tx: watch::Sender<Arc<ConfigSnapshot>>,
}

impl SiteConfigContext {
    /// Create a context holding defaults. Call [`Self::load`] to populate it.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        let (tx, _) = watch::channel(Arc::new(ConfigSnapshot::initial()));
        Self {
            persistence: ConfigPersistence::new(store),
            tx,
        }
    }

    /// Load persisted settings, resolve them and publish the result.
    ///
    /// A store failure is logged and the defaults are published instead, so
    /// the site comes up open with the default look.
    pub async fn load(&self) -> Arc<ConfigSnapshot> {
        let (theme, maintenance) = match self.persistence.load().await {
            Ok(bundle) => (
                ThemeResolver::resolve_stored(&bundle.theme),
                ThemeResolver::resolve_maintenance(&bundle.maintenance),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Site settings unavailable, using defaults");
                (ThemeConfig::default(), MaintenanceConfig::default())
            }
        };

        self.tx
            .send_modify(|snap| *snap = Arc::new(snap.next(theme, maintenance)));
        let snapshot = self.snapshot();
        tracing::info!(
            version = snapshot.version,
            theme_mode = snapshot.theme.mode.as_str(),
            maintenance_enabled = snapshot.maintenance.enabled,
            "Site configuration ready",
        );
        snapshot
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.tx.borrow().clone()
    }

    /// Observe every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ConfigSnapshot>> {
        self.tx.subscribe()
    }

    /// Theme as rendered for the given system preference.
    pub fn effective_theme(&self, system_prefers_dark: bool) -> ThemeConfig {
        ThemeResolver::effective(&self.snapshot().theme, system_prefers_dark)
    }

    /// Apply a partial theme update, publish it, and persist it.
    pub fn update_theme(&self, patch: &ThemePatch) -> Result<PersistHandle, CoreError> {
        let mut failure = None;
        self.tx.send_if_modified(|snap| match snap.theme.apply_patch(patch) {
            Ok(theme) => {
                *snap = Arc::new(snap.next(theme, snap.maintenance.clone()));
                true
            }
            Err(e) => {
                failure = Some(e);
                false
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }

        let snapshot = self.snapshot();
        tracing::info!(
            version = snapshot.version,
            mode = snapshot.theme.mode.as_str(),
            "Theme updated",
        );
        Ok(self.persist_theme(snapshot.theme.clone()))
    }

    /// Apply a partial maintenance update, publish it, and persist it.
    pub fn update_maintenance(&self, patch: &MaintenancePatch) -> Result<PersistHandle, CoreError> {
        let mut failure = None;
        self.tx
            .send_if_modified(|snap| match snap.maintenance.apply_patch(patch) {
                Ok(maintenance) => {
                    *snap = Arc::new(snap.next(snap.theme.clone(), maintenance));
                    true
                }
                Err(e) => {
                    failure = Some(e);
                    false
                }
            });
        if let Some(e) = failure {
            return Err(e);
        }

        let snapshot = self.snapshot();
        tracing::info!(
            version = snapshot.version,
            enabled = snapshot.maintenance.enabled,
            mode = snapshot.maintenance.mode.as_str(),
            excluded_pages = snapshot.maintenance.excluded_pages.len(),
            "Maintenance configuration updated",
        );
        Ok(self.persist_maintenance(snapshot.maintenance.clone()))
    }

    /// Replace the theme with the built-in defaults.
    pub fn reset_theme(&self) -> PersistHandle {
        self.tx
            .send_modify(|snap| *snap = Arc::new(snap.next(ThemeConfig::default(), snap.maintenance.clone())));
        tracing::info!(version = self.snapshot().version, "Theme reset to defaults");
        self.persist_theme(ThemeConfig::default())
    }

    /// Replace the maintenance config with the built-in defaults.
    pub fn reset_maintenance(&self) -> PersistHandle {
        self.tx
            .send_modify(|snap| *snap = Arc::new(snap.next(snap.theme.clone(), MaintenanceConfig::default())));
        tracing::info!(version = self.snapshot().version, "Maintenance reset to defaults");
        self.persist_maintenance(MaintenanceConfig::default())
    }

    /// Serialize the current snapshot.
    pub fn export(&self) -> Result<String, CoreError> {
        let snapshot = self.snapshot();
        export_blob(&snapshot.theme, &snapshot.maintenance)
    }

    /// Apply the sections present in an export blob.
    ///
    /// Nothing changes unless the blob parses and every present section
    /// validates against the current snapshot.
    pub fn import(&self, blob: &str) -> Result<ImportOutcome, CoreError> {
        let bundle = parse_import(blob)?;

        let current = self.snapshot();
        if let Some(patch) = &bundle.theme {
            current.theme.apply_patch(patch)?;
        }
        if let Some(patch) = &bundle.maintenance {
            current.maintenance.apply_patch(patch)?;
        }

        let mut outcome = ImportOutcome {
            sections: bundle.sections(),
            persist: Vec::new(),
        };
        if let Some(patch) = &bundle.theme {
            outcome.persist.push(self.update_theme(patch)?);
        }
        if let Some(patch) = &bundle.maintenance {
            outcome.persist.push(self.update_maintenance(patch)?);
        }

        tracing::info!(sections = ?outcome.sections, "Site configuration imported");
        Ok(outcome)
    }

    fn persist_theme(&self, theme: ThemeConfig) -> PersistHandle {
        let persistence = self.persistence.clone();
        PersistHandle {
            inner: tokio::spawn(async move { persistence.save_theme(&theme).await }),
        }
    }

    fn persist_maintenance(&self, maintenance: MaintenanceConfig) -> PersistHandle {
        let persistence = self.persistence.clone();
        PersistHandle {
            inner: tokio::spawn(async move { persistence.save_maintenance(&maintenance).await }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

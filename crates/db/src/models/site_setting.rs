//! Site setting model.

use kindred_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `site_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

//! # Settings Repository
//!
//! Key/value device settings. Structured values are stored as JSON text.

use annabill_core::AppSettings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Key holding the serialized [`AppSettings`].
pub const APP_SETTINGS_KEY: &str = "app_settings";

/// Key holding the last connected printer.
pub const SAVED_PRINTER_KEY: &str = "saved_printer";

/// Repository for the `settings` table.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Raw value for `key`.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Inserts or replaces the value for `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key, "Writing setting");
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM settings WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Value for `key` decoded from JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DbError::corrupt("Setting", key, e)),
            None => Ok(None),
        }
    }

    /// Stores `value` under `key` as JSON.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| DbError::Internal(format!("Failed to encode setting {key}: {e}")))?;
        self.set(key, &raw).await
    }

    /// Stored app settings, or defaults when none were saved yet.
    pub async fn app_settings(&self) -> DbResult<AppSettings> {
        Ok(self
            .get_json::<AppSettings>(APP_SETTINGS_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_app_settings(&self, settings: &AppSettings) -> DbResult<()> {
        self.set_json(APP_SETTINGS_KEY, settings).await
    }
}

//! # Configuration Commands
//!
//! Read and change outlet settings.

use annabill_core::AppSettings;
use tracing::info;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SharedConfig};

/// Gets the current configuration.
pub fn get_config(config: &SharedConfig) -> ConfigState {
    config.get()
}

/// Saves new outlet settings and applies them right away.
///
/// ## Errors
/// - `VALIDATION_ERROR`: blank or overlong shop name
/// - `DATABASE_ERROR`: settings could not be stored; nothing changes
pub async fn update_settings(
    db: &DbState,
    config: &SharedConfig,
    settings: AppSettings,
) -> Result<ConfigState, ApiError> {
    ConfigState::validate_settings(&settings)?;
    let settings = AppSettings {
        shop_name: settings.shop_name.trim().to_string(),
        ..settings
    };

    db.inner().settings().save_app_settings(&settings).await?;
    info!(shop_name = %settings.shop_name, auto_print = settings.auto_print, "Settings updated");

    Ok(config.update(|c| *c = c.clone().with_settings(&settings)))
}

//! # Configuration State
//!
//! Outlet configuration: shop name, bill prefix, auto-print and printer.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`ANNABILL_*`)
//! 2. Saved settings (`settings` table, key `app_settings`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Settings can change from the settings screen while the terminal runs, so
//! the app keeps this behind a `RwLock` and commands read a copy.

use annabill_core::validation::{validate_bill_prefix, validate_shop_name};
use annabill_core::{AppSettings, ValidationError, DEFAULT_BILL_PREFIX, DEFAULT_SHOP_NAME};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tracing::warn;
use ts_rs::TS;

pub const ENV_SHOP_NAME: &str = "ANNABILL_SHOP_NAME";
pub const ENV_BILL_PREFIX: &str = "ANNABILL_BILL_PREFIX";
pub const ENV_AUTO_PRINT: &str = "ANNABILL_AUTO_PRINT";
pub const ENV_PRINTER_ADDR: &str = "ANNABILL_PRINTER_ADDR";

/// Terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Printed in the receipt header.
    pub shop_name: String,

    /// First part of every bill number.
    /// Default: "AB"
    pub bill_prefix: String,

    /// Print right after a bill is saved.
    pub auto_print: bool,

    /// Network printer (`host:port`) to use when none was saved.
    pub printer_addr: Option<String>,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            shop_name: DEFAULT_SHOP_NAME.to_string(),
            bill_prefix: DEFAULT_BILL_PREFIX.to_string(),
            auto_print: true,
            printer_addr: None,
        }
    }
}

impl ConfigState {
    /// Applies saved outlet settings.
    pub fn with_settings(mut self, settings: &AppSettings) -> Self {
        self.shop_name = settings.shop_name.clone();
        self.auto_print = settings.auto_print;
        self
    }

    /// Applies `ANNABILL_*` overrides read through `lookup` (the process
    /// environment at startup). Invalid values are ignored with a warning.
    ///
    /// ## Keys
    /// - `ANNABILL_SHOP_NAME`: Override shop name
    /// - `ANNABILL_BILL_PREFIX`: Override bill prefix (e.g. "BP")
    /// - `ANNABILL_AUTO_PRINT`: "true"/"false", "1"/"0"
    /// - `ANNABILL_PRINTER_ADDR`: Network printer address
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(name) = lookup(ENV_SHOP_NAME) {
            match validate_shop_name(&name) {
                Ok(()) => self.shop_name = name.trim().to_string(),
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_SHOP_NAME),
            }
        }

        if let Some(prefix) = lookup(ENV_BILL_PREFIX) {
            match validate_bill_prefix(&prefix) {
                Ok(()) => self.bill_prefix = prefix,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_BILL_PREFIX),
            }
        }

        if let Some(flag) = lookup(ENV_AUTO_PRINT) {
            match parse_flag(&flag) {
                Some(value) => self.auto_print = value,
                None => warn!(value = %flag, "Ignoring {}", ENV_AUTO_PRINT),
            }
        }

        if let Some(addr) = lookup(ENV_PRINTER_ADDR) {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.printer_addr = Some(addr.to_string());
            }
        }

        self
    }

    /// The part of the configuration stored as [`AppSettings`].
    pub fn settings(&self) -> AppSettings {
        AppSettings {
            shop_name: self.shop_name.clone(),
            auto_print: self.auto_print,
        }
    }

    /// Checks values coming from the settings screen.
    pub fn validate_settings(settings: &AppSettings) -> Result<(), ValidationError> {
        validate_shop_name(&settings.shop_name)
    }
}

/// [`ConfigState`] shared between commands.
#[derive(Debug, Default)]
pub struct SharedConfig {
    inner: RwLock<ConfigState>,
}

impl SharedConfig {
    pub fn new(config: ConfigState) -> Self {
        SharedConfig {
            inner: RwLock::new(config),
        }
    }

    /// Copy of the current configuration.
    pub fn get(&self) -> ConfigState {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Changes the configuration in place and returns the result.
    pub fn update(&self, f: impl FnOnce(&mut ConfigState)) -> ConfigState {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
        guard.clone()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.shop_name, "AnnaBill");
        assert_eq!(config.bill_prefix, "AB");
        assert!(config.auto_print);
        assert_eq!(config.printer_addr, None);
    }

    #[test]
    fn test_env_overrides_saved_settings() {
        let saved = AppSettings {
            shop_name: "Anna Mess".to_string(),
            auto_print: false,
        };
        let config = ConfigState::default()
            .with_settings(&saved)
            .with_overrides(lookup(&[
                (ENV_BILL_PREFIX, "BP"),
                (ENV_AUTO_PRINT, "yes"),
                (ENV_PRINTER_ADDR, "192.168.1.50:9100"),
            ]));

        assert_eq!(config.shop_name, "Anna Mess");
        assert_eq!(config.bill_prefix, "BP");
        assert!(config.auto_print);
        assert_eq!(config.printer_addr.as_deref(), Some("192.168.1.50:9100"));
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let config = ConfigState::default().with_overrides(lookup(&[
            (ENV_SHOP_NAME, "   "),
            (ENV_BILL_PREFIX, "bp-1"),
            (ENV_AUTO_PRINT, "maybe"),
        ]));
        assert_eq!(config, ConfigState::default());
    }

    #[test]
    fn test_shared_config_update() {
        let shared = SharedConfig::new(ConfigState::default());
        let updated = shared.update(|c| c.auto_print = false);
        assert!(!updated.auto_print);
        assert!(!shared.get().auto_print);
    }
}

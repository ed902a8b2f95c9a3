//! # AnnaBill Terminal Library
//!
//! The counter terminal: wires the bill store, the order being built, the
//! outlet configuration and the receipt printer, and exposes them as
//! commands for the UI shell.
//!
//! ## Module Organization
//! ```text
//! annabill_terminal/
//! ├── lib.rs          ◄─── You are here (startup & wiring)
//! ├── state/
//! │   ├── db.rs       ◄─── DbState (bill store)
//! │   ├── order.rs    ◄─── OrderState (current order + checkout gate)
//! │   ├── config.rs   ◄─── ConfigState (shop name, prefix, auto print)
//! │   └── printer.rs  ◄─── PrinterState (printer manager)
//! ├── printer/        ◄─── Transports, reconnects, receipt jobs
//! ├── commands/       ◄─── order, bill, printer, config
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()                                                      │
//! │  2. database_path()  ──► ANNABILL_DB_PATH or platform data dir         │
//! │  3. Database::new()  ──► WAL, migrations                               │
//! │  4. ConfigState      ──► defaults ◄ saved settings ◄ ANNABILL_* env    │
//! │  5. Bill prefix handed to the bill store                               │
//! │  6. PrinterManager   ──► auto-connect to the saved printer             │
//! │  7. Terminal ready   ──► commands served to the UI shell               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod printer;
pub mod state;

use std::path::PathBuf;

use annabill_core::menu::Menu;
use annabill_core::PrinterDevice;
use annabill_db::{Database, DbConfig};
use directories::ProjectDirs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use error::ApiError;
use printer::{parse_addr, NetworkTransport, PrinterManager, PrinterTransport};
use state::{ConfigState, DbState, OrderState, PrinterState, SharedConfig, ENV_PRINTER_ADDR};

/// Environment variable overriding the database file.
pub const ENV_DB_PATH: &str = "ANNABILL_DB_PATH";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,annabill=debug,sqlx=warn";

/// Everything the commands need, created once at startup.
pub struct Terminal<T> {
    pub db: DbState,
    pub order: OrderState,
    pub config: SharedConfig,
    pub menu: Menu,
    pub printer: PrinterState<T>,
}

impl<T: PrinterTransport> Terminal<T> {
    /// Opens the terminal with configuration from the environment.
    pub async fn open(db_config: DbConfig, transport: T) -> Result<Self, ApiError> {
        Self::open_with(db_config, transport, |key| std::env::var(key).ok()).await
    }

    /// Opens the terminal with overrides taken from `lookup` instead of the
    /// process environment.
    pub async fn open_with(
        db_config: DbConfig,
        transport: T,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ApiError> {
        let db = Database::new(db_config).await?;
        info!("Database connected and migrations applied");

        let saved = match db.settings().app_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Saved settings unreadable, using defaults");
                Default::default()
            }
        };
        let config = ConfigState::default()
            .with_settings(&saved)
            .with_overrides(lookup);
        let db = db.with_bill_prefix(config.bill_prefix.clone());

        let mut manager = PrinterManager::new(transport).with_store(db.settings());
        if let Some(device) = configured_printer(&config) {
            manager = manager.with_saved_printer(device);
        }
        manager.auto_connect().await;

        info!(
            shop_name = %config.shop_name,
            bill_prefix = %config.bill_prefix,
            auto_print = config.auto_print,
            printer_connected = manager.status().connected,
            "Terminal ready"
        );

        Ok(Terminal {
            db: DbState::new(db),
            order: OrderState::new(),
            config: SharedConfig::new(config),
            menu: Menu::default(),
            printer: PrinterState::new(manager),
        })
    }
}

fn configured_printer(config: &ConfigState) -> Option<PrinterDevice> {
    let addr = config.printer_addr.as_deref()?;
    match parse_addr(addr) {
        Ok(socket) => Some(PrinterDevice {
            id: socket.to_string(),
            name: format!("Printer {}", socket.ip()),
            address: socket.to_string(),
        }),
        Err(e) => {
            warn!(error = %e, "Ignoring {}", ENV_PRINTER_ADDR);
            None
        }
    }
}

/// Runs the terminal until Ctrl-C.
pub async fn run() -> Result<(), ApiError> {
    init_tracing();
    info!("Starting AnnaBill terminal");

    let db_path = database_path()?;
    info!(?db_path, "Database path determined");

    let transport = match std::env::var(ENV_PRINTER_ADDR) {
        Ok(addr) => NetworkTransport::from_addr(&addr)?,
        Err(_) => NetworkTransport::new(Vec::new()),
    };
    let terminal = Terminal::open(DbConfig::new(db_path), transport).await?;

    let sales = commands::bill::daily_sales(&terminal.db, None).await?;
    info!(bills = sales.count, total = %sales.total, "Today so far");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| ApiError::internal(format!("Signal handler failed: {e}")))?;

    info!("Shutting down");
    terminal.db.inner().close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=annabill=trace` - Show trace for annabill crates only
/// - Default: INFO, DEBUG for annabill, WARN for sqlx
pub fn init_tracing() {
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.annabill.pos/annabill.db`
/// - **Windows**: `%APPDATA%\annabill\pos\data\annabill.db`
/// - **Linux**: `~/.local/share/pos/annabill.db`
///
/// ## Override
/// Set `ANNABILL_DB_PATH` to use a custom path.
pub fn database_path() -> Result<PathBuf, ApiError> {
    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "annabill", "pos")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;
    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir)
        .map_err(|e| ApiError::internal(format!("Could not create {}: {e}", data_dir.display())))?;

    Ok(data_dir.join("annabill.db"))
}

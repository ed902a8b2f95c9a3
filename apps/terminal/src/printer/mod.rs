//! # Receipt Printing
//!
//! Owns the connection to the counter printer and keeps it alive.
//!
//! ## Connection Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────┐  connect()   ┌──────────────┐  send fails            │
//! │  │ Disconnected │─────────────►│  Connected   │──────────────┐         │
//! │  └──────────────┘              └──────────────┘              │         │
//! │         ▲                             ▲                      ▼         │
//! │         │ disconnect()                │ ok        ┌───────────────────┐│
//! │         │ forget()                    └───────────│ Reconnecting      ││
//! │         │                                         │ (saved printer,   ││
//! │         └─────────────────────────────────────────│  max 3 attempts,  ││
//! │                     attempts exhausted            │  5s apart)        ││
//! │                                                   └───────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The last connected printer is saved in the settings table so the
//! terminal reconnects to it on startup and after a dropped link.

mod encoding;
mod error;
mod transport;

pub use encoding::{encode_receipt, SELECT_WPC1252};
pub use error::{PrintError, PrintResult};
pub use transport::{
    parse_addr, MemoryTransport, NetworkTransport, PrinterTransport, DEFAULT_PRINTER_PORT,
};

use std::time::Duration;

use annabill_core::menu::Menu;
use annabill_core::order::Order;
use annabill_core::receipt::render_receipt;
use annabill_core::{Bill, NewBill, PrinterDevice, PrinterStatus};
use annabill_db::repository::settings::SAVED_PRINTER_KEY;
use annabill_db::SettingsRepository;
use chrono::Local;
use tracing::{info, warn};

/// Bill number printed on test receipts. Never stored.
pub const TEST_BILL_NUMBER: &str = "TEST-001";

const RECONNECT_FAILED: &str = "Auto-reconnect failed after multiple attempts";
const CONNECTION_LOST: &str = "Connection lost. Attempting to reconnect...";

/// Reconnect policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterSettings {
    /// Pause between reconnect attempts.
    /// Default: 5 seconds
    pub reconnect_interval: Duration,

    /// Reconnect attempts before giving up.
    /// Default: 3
    pub max_reconnect_attempts: u32,

    /// Upper bound for a single connect.
    /// Default: 10 seconds
    pub connect_timeout: Duration,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            reconnect_interval: Duration::from_secs(5),
            max_reconnect_attempts: 3,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Printer connection manager.
///
/// ## Usage
/// ```rust,ignore
/// let mut printer = PrinterManager::new(NetworkTransport::from_addr("192.168.1.50")?)
///     .with_store(db.settings());
/// printer.auto_connect().await;
/// printer.print_bill(&bill, "AnnaBill").await?;
/// ```
#[derive(Debug)]
pub struct PrinterManager<T> {
    transport: T,
    settings: PrinterSettings,
    status: PrinterStatus,
    saved: Option<PrinterDevice>,
    store: Option<SettingsRepository>,

    /// Cleared by an explicit disconnect so printing does not quietly
    /// bring the link back.
    auto_reconnect: bool,
}

impl<T: PrinterTransport> PrinterManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            settings: PrinterSettings::default(),
            status: PrinterStatus::default(),
            saved: None,
            store: None,
            auto_reconnect: true,
        }
    }

    pub fn with_settings(mut self, settings: PrinterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Persist the saved printer through `store`.
    pub fn with_store(mut self, store: SettingsRepository) -> Self {
        self.store = Some(store);
        self
    }

    /// Remember `device` without connecting (e.g. from configuration).
    pub fn with_saved_printer(mut self, device: PrinterDevice) -> Self {
        self.saved = Some(device);
        self
    }

    pub fn status(&self) -> PrinterStatus {
        self.status.clone()
    }

    pub fn saved_printer(&self) -> Option<&PrinterDevice> {
        self.saved.as_ref()
    }

    pub fn settings(&self) -> PrinterSettings {
        self.settings
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // Connection
    // =========================================================================

    /// Loads the saved printer and tries it once. Failures only update status.
    ///
    /// A printer given through [`PrinterManager::with_saved_printer`] takes
    /// precedence over the stored one.
    pub async fn auto_connect(&mut self) {
        if let (None, Some(store)) = (&self.saved, &self.store) {
            match store.get_json::<PrinterDevice>(SAVED_PRINTER_KEY).await {
                Ok(Some(device)) => self.saved = Some(device),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Could not load saved printer"),
            }
        }

        let Some(device) = self.saved.clone() else {
            return;
        };
        info!(printer = %device.name, "Auto-connecting to saved printer");
        if let Err(e) = self.connect_once(&device).await {
            warn!(printer = %device.name, error = %e, "Auto-connect failed");
        }
    }

    /// Lists reachable printers.
    pub async fn scan(&mut self) -> PrintResult<Vec<PrinterDevice>> {
        match self.transport.discover().await {
            Ok(devices) => {
                info!(count = devices.len(), "Printer scan complete");
                Ok(devices)
            }
            Err(e) => {
                self.status.error = Some("Failed to scan for printers".to_string());
                Err(e)
            }
        }
    }

    /// Connects to `device` and saves it for reconnects.
    pub async fn connect(&mut self, device: &PrinterDevice) -> PrintResult<PrinterStatus> {
        self.connect_once(device).await?;
        self.auto_reconnect = true;
        self.saved = Some(device.clone());

        if let Some(store) = &self.store {
            if let Err(e) = store.set_json(SAVED_PRINTER_KEY, device).await {
                warn!(error = %e, "Could not save printer");
            }
        }
        Ok(self.status())
    }

    /// Closes the link. The saved printer is kept for the next connect.
    pub async fn disconnect(&mut self) -> PrintResult<PrinterStatus> {
        self.transport.disconnect().await?;
        self.auto_reconnect = false;
        self.status = PrinterStatus::default();
        info!("Disconnected from printer");
        Ok(self.status())
    }

    /// Disconnects and drops the saved printer.
    pub async fn forget(&mut self) -> PrintResult<PrinterStatus> {
        self.saved = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.delete(SAVED_PRINTER_KEY).await {
                warn!(error = %e, "Could not delete saved printer");
            }
        }
        self.disconnect().await
    }

    async fn connect_once(&mut self, device: &PrinterDevice) -> PrintResult<()> {
        self.status = PrinterStatus {
            connected: false,
            name: Some(device.name.clone()),
            error: None,
        };

        let result =
            match tokio::time::timeout(self.settings.connect_timeout, self.transport.connect(device))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(PrintError::Timeout(format!(
                    "Connection timeout: {}",
                    device.address
                ))),
            };

        match result {
            Ok(()) => {
                self.status.connected = true;
                info!(printer = %device.name, "Connected to printer");
                Ok(())
            }
            Err(e) => {
                self.status = PrinterStatus {
                    connected: false,
                    name: None,
                    error: Some(format!("Failed to connect to {}", device.name)),
                };
                Err(e)
            }
        }
    }

    /// Brings the saved printer back, at most `max_reconnect_attempts` times.
    async fn reconnect(&mut self) -> PrintResult<()> {
        let device = match (&self.saved, self.auto_reconnect) {
            (Some(device), true) => device.clone(),
            _ => {
                self.status.error = Some(PrintError::NotConnected.to_string());
                return Err(PrintError::NotConnected);
            }
        };

        let max = self.settings.max_reconnect_attempts;
        for attempt in 1..=max {
            if attempt > 1 {
                tokio::time::sleep(self.settings.reconnect_interval).await;
            }
            info!(attempt, max, printer = %device.name, "Reconnect attempt");
            if self.connect_once(&device).await.is_ok() {
                return Ok(());
            }
        }

        self.status.error = Some(RECONNECT_FAILED.to_string());
        Err(PrintError::ReconnectExhausted { attempts: max })
    }

    // =========================================================================
    // Printing
    // =========================================================================

    /// Sends one job, reconnecting to the saved printer when needed.
    ///
    /// A failed send is treated as a lost connection and retried once after
    /// a successful reconnect.
    pub async fn print(&mut self, data: &[u8]) -> PrintResult<()> {
        if !self.status.connected {
            self.reconnect().await?;
        }

        let first = self.transport.send(data).await;
        let Err(e) = first else {
            self.status.error = None;
            return Ok(());
        };

        warn!(error = %e, "Print failed, treating as connection loss");
        self.status.connected = false;
        self.status.error = Some(CONNECTION_LOST.to_string());
        self.reconnect().await?;

        match self.transport.send(data).await {
            Ok(()) => {
                self.status.error = None;
                Ok(())
            }
            Err(e) => {
                self.status.connected = false;
                self.status.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Prints a saved bill.
    pub async fn print_bill(&mut self, bill: &Bill, shop_name: &str) -> PrintResult<()> {
        info!(bill_number = %bill.bill_number, "Printing bill");
        let receipt = render_receipt(bill, Some(shop_name));
        self.print(&encode_receipt(&receipt)).await
    }

    /// Prints a sample receipt (Tea ×2) that is not stored anywhere.
    pub async fn test_print(&mut self, shop_name: &str) -> PrintResult<()> {
        self.print_bill(&test_bill(), shop_name).await
    }
}

/// The sample bill used by [`PrinterManager::test_print`].
pub fn test_bill() -> Bill {
    let menu = Menu::default();
    let mut order = Order::new();
    if let Some(tea) = menu.item("tea") {
        order = order.add_item(tea, None, vec![]).add_item(tea, None, vec![]);
    }
    let new_bill = NewBill::from(&order);

    Bill {
        id: None,
        bill_number: TEST_BILL_NUMBER.to_string(),
        order_type: new_bill.order_type,
        items: new_bill.items,
        subtotal: new_bill.subtotal,
        total: new_bill.total,
        created_at: Local::now().fixed_offset(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

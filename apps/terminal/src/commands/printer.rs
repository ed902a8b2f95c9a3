//! # Printer Commands
//!
//! Printer settings screen: status pill, scan, connect, test print.

use annabill_core::{PrinterDevice, PrinterStatus};
use tracing::info;

use crate::error::ApiError;
use crate::printer::PrinterTransport;
use crate::state::{PrinterState, SharedConfig};

/// Current connection state.
pub async fn get_printer_status<T: PrinterTransport>(printer: &PrinterState<T>) -> PrinterStatus {
    printer.lock().await.status()
}

/// Lists printers that can be reached.
pub async fn scan_printers<T: PrinterTransport>(
    printer: &PrinterState<T>,
) -> Result<Vec<PrinterDevice>, ApiError> {
    info!("scan_printers command");
    Ok(printer.lock().await.scan().await?)
}

/// Connects to a printer and remembers it.
pub async fn connect_printer<T: PrinterTransport>(
    printer: &PrinterState<T>,
    device: PrinterDevice,
) -> Result<PrinterStatus, ApiError> {
    info!(printer = %device.name, "connect_printer command");
    Ok(printer.lock().await.connect(&device).await?)
}

/// Disconnects. The printer stays remembered.
pub async fn disconnect_printer<T: PrinterTransport>(
    printer: &PrinterState<T>,
) -> Result<PrinterStatus, ApiError> {
    Ok(printer.lock().await.disconnect().await?)
}

/// Disconnects and forgets the remembered printer.
pub async fn forget_printer<T: PrinterTransport>(
    printer: &PrinterState<T>,
) -> Result<PrinterStatus, ApiError> {
    Ok(printer.lock().await.forget().await?)
}

/// Prints a sample receipt with the configured shop name.
pub async fn test_print<T: PrinterTransport>(
    config: &SharedConfig,
    printer: &PrinterState<T>,
) -> Result<PrinterStatus, ApiError> {
    info!("test_print command");
    let shop_name = config.get().shop_name;
    let mut manager = printer.lock().await;
    manager.test_print(&shop_name).await?;
    Ok(manager.status())
}

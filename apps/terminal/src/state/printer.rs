//! # Printer State
//!
//! The printer manager behind an async mutex. Print jobs hold the lock
//! across network I/O, so the lock is `tokio::sync::Mutex`.

use tokio::sync::{Mutex, MutexGuard};

use crate::printer::{PrinterManager, PrinterTransport};

/// Shared printer manager.
#[derive(Debug)]
pub struct PrinterState<T> {
    manager: Mutex<PrinterManager<T>>,
}

impl<T: PrinterTransport> PrinterState<T> {
    pub fn new(manager: PrinterManager<T>) -> Self {
        PrinterState {
            manager: Mutex::new(manager),
        }
    }

    /// Waits for exclusive access to the printer.
    pub async fn lock(&self) -> MutexGuard<'_, PrinterManager<T>> {
        self.manager.lock().await
    }
}

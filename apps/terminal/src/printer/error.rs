//! Error types for receipt printing.

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Could not open a connection to the printer.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error while sending a job.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timed out waiting for the printer.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// No printer is connected and none can be reconnected.
    #[error("Printer not connected")]
    NotConnected,

    /// Every automatic reconnect attempt failed.
    #[error("Auto-reconnect failed after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    /// Invalid printer configuration (bad address, unknown device).
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    /// Whether the printer link itself is down, as opposed to a bad request.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            PrintError::Connection(_)
                | PrintError::Timeout(_)
                | PrintError::NotConnected
                | PrintError::ReconnectExhausted { .. }
        )
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;

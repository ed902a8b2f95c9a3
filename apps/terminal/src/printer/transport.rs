//! Printer transports: how receipt bytes reach the device.
//!
//! - [`NetworkTransport`]: raw TCP (port 9100), the protocol almost every
//!   thermal printer speaks
//! - [`MemoryTransport`]: keeps jobs in memory, with scripted failures

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use annabill_core::PrinterDevice;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, warn};

use super::error::{PrintError, PrintResult};

/// Default raw-print port.
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// A link to a receipt printer.
///
/// Implementations hold at most one open connection. `send` on a closed
/// link fails with [`PrintError::NotConnected`].
#[allow(async_fn_in_trait)]
pub trait PrinterTransport {
    /// Printers that can be reached right now.
    async fn discover(&self) -> PrintResult<Vec<PrinterDevice>>;

    /// Opens a connection, replacing any existing one.
    async fn connect(&mut self, device: &PrinterDevice) -> PrintResult<()>;

    /// Sends one complete print job.
    async fn send(&mut self, data: &[u8]) -> PrintResult<()>;

    /// Closes the connection. Closing a closed link is not an error.
    async fn disconnect(&mut self) -> PrintResult<()>;
}

// =============================================================================
// Network
// =============================================================================

/// Network printer (TCP port 9100).
///
/// Discovery probes a list of known addresses, since raw-print printers do
/// not announce themselves.
#[derive(Debug)]
pub struct NetworkTransport {
    known: Vec<PrinterDevice>,
    timeout: Duration,
    probe_timeout: Duration,
    stream: Option<TcpStream>,
}

impl NetworkTransport {
    pub fn new(known: Vec<PrinterDevice>) -> Self {
        Self {
            known,
            timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_millis(500),
            stream: None,
        }
    }

    /// Transport that knows a single printer at `addr` (`host:port`).
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let socket = parse_addr(addr)?;
        Ok(Self::new(vec![PrinterDevice {
            id: socket.to_string(),
            name: format!("Printer {}", socket.ip()),
            address: socket.to_string(),
        }]))
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how long discovery waits for each address.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

/// Parses `host:port`, or a bare host with the default port.
pub fn parse_addr(addr: &str) -> PrintResult<SocketAddr> {
    let addr = addr.trim();
    addr.parse::<SocketAddr>()
        .or_else(|_| format!("{addr}:{DEFAULT_PRINTER_PORT}").parse())
        .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {addr}")))
}

impl PrinterTransport for NetworkTransport {
    async fn discover(&self) -> PrintResult<Vec<PrinterDevice>> {
        let mut found = Vec::new();
        for device in &self.known {
            let addr = match parse_addr(&device.address) {
                Ok(addr) => addr,
                Err(e) => {
                    warn!(device = %device.name, error = %e, "Skipping printer");
                    continue;
                }
            };
            match tokio::time::timeout(self.probe_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(_)) => {
                    debug!(%addr, "Printer online");
                    found.push(device.clone());
                }
                Ok(Err(e)) => debug!(%addr, error = %e, "Printer offline"),
                Err(_) => debug!(%addr, "Printer probe timeout"),
            }
        }
        Ok(found)
    }

    #[instrument(skip(self), fields(addr = %device.address))]
    async fn connect(&mut self, device: &PrinterDevice) -> PrintResult<()> {
        let addr = parse_addr(&device.address)?;
        self.stream = None;

        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {addr}")))?
            .map_err(|e| PrintError::Connection(format!("{addr}: {e}")))?;

        info!("Connected to printer");
        self.stream = Some(stream);
        Ok(())
    }

    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        let stream = self.stream.as_mut().ok_or(PrintError::NotConnected)?;

        let result = async {
            stream.write_all(data).await?;
            stream.flush().await
        }
        .await;

        if let Err(e) = result {
            // The socket is unusable after a failed write.
            self.stream = None;
            return Err(PrintError::Io(e));
        }

        info!("Print job sent");
        Ok(())
    }

    async fn disconnect(&mut self) -> PrintResult<()> {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!(error = %e, "Shutdown after disconnect failed");
            }
        }
        Ok(())
    }
}

// =============================================================================
// Memory
// =============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    devices: Vec<PrinterDevice>,
    connected: Option<String>,
    jobs: Vec<Vec<u8>>,
    connect_attempts: u32,
    failing_connects: u32,
    failing_sends: u32,
}

/// In-memory printer. Clones share the same recorded jobs.
///
/// ## Example
/// ```rust,ignore
/// let transport = MemoryTransport::new(vec![device.clone()]);
/// transport.fail_next_connects(2);
/// // first two connects fail, the third succeeds
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryTransport {
    pub fn new(devices: Vec<PrinterDevice>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                devices,
                ..MemoryInner::default()
            })),
        }
    }

    fn inner(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes the next `n` connects fail.
    pub fn fail_next_connects(&self, n: u32) {
        self.inner().failing_connects = n;
    }

    /// Makes the next `n` sends fail and drop the connection.
    pub fn fail_next_sends(&self, n: u32) {
        self.inner().failing_sends = n;
    }

    /// Every job sent so far, oldest first.
    pub fn jobs(&self) -> Vec<Vec<u8>> {
        self.inner().jobs.clone()
    }

    pub fn connect_attempts(&self) -> u32 {
        self.inner().connect_attempts
    }

    pub fn connected_to(&self) -> Option<String> {
        self.inner().connected.clone()
    }
}

impl PrinterTransport for MemoryTransport {
    async fn discover(&self) -> PrintResult<Vec<PrinterDevice>> {
        Ok(self.inner().devices.clone())
    }

    async fn connect(&mut self, device: &PrinterDevice) -> PrintResult<()> {
        let mut inner = self.inner();
        inner.connect_attempts += 1;
        inner.connected = None;

        if inner.failing_connects > 0 {
            inner.failing_connects -= 1;
            return Err(PrintError::Connection(format!("{} unreachable", device.address)));
        }
        if !inner.devices.iter().any(|d| d.id == device.id) {
            return Err(PrintError::Connection(format!("{} not found", device.id)));
        }

        inner.connected = Some(device.id.clone());
        Ok(())
    }

    async fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        let mut inner = self.inner();
        if inner.connected.is_none() {
            return Err(PrintError::NotConnected);
        }
        if inner.failing_sends > 0 {
            inner.failing_sends -= 1;
            inner.connected = None;
            return Err(PrintError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "printer went away",
            )));
        }
        inner.jobs.push(data.to_vec());
        Ok(())
    }

    async fn disconnect(&mut self) -> PrintResult<()> {
        self.inner().connected = None;
        Ok(())
    }
}

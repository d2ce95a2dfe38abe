//! TCP transport for network label printers (port 9100 / JetDirect / RAW).

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};

use crate::addr::resolve_printer_addr;
use crate::{PrintError, Printer, PrinterConfig};

/// A synchronous TCP connection to a label printer's RAW port.
///
/// Rendered documents are sent as-is; the printer interprets them as ZPL.
/// This transport is send-only — it never waits for a printer response.
pub struct TcpPrinter {
    stream: TcpStream,
    config: PrinterConfig,
    addr: SocketAddr,
}

impl TcpPrinter {
    /// Connect to a printer at the given address.
    ///
    /// The address can be any format accepted by [`resolve_printer_addr`]:
    /// `IP`, `IP:PORT`, `hostname`, `hostname:PORT`. Port defaults to 9100.
    ///
    /// Configures the socket with TCP_NODELAY, TCP keepalive (60s interval),
    /// and the connect/write timeouts from [`PrinterConfig`].
    pub fn connect(addr: &str, config: PrinterConfig) -> Result<Self, PrintError> {
        let socket_addr = resolve_printer_addr(addr)?;
        let stream = open_stream(&socket_addr, &config)?;

        Ok(Self {
            stream,
            config,
            addr: socket_addr,
        })
    }

    /// Re-establish the TCP connection after a drop or error.
    pub fn reconnect(&mut self) -> Result<(), PrintError> {
        // Best-effort shutdown of the old stream
        let _ = self.stream.shutdown(Shutdown::Both);

        self.stream = open_stream(&self.addr, &self.config)?;
        Ok(())
    }

    /// Return the resolved socket address this printer is connected to.
    pub fn remote_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for TcpPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.stream
            .write_all(data)
            .map_err(PrintError::WriteFailed)?;
        self.stream.flush().map_err(PrintError::WriteFailed)?;
        Ok(())
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Open a TCP connection and configure the stream (nodelay, keepalive, timeouts).
fn open_stream(addr: &SocketAddr, config: &PrinterConfig) -> Result<TcpStream, PrintError> {
    let stream = TcpStream::connect_timeout(addr, config.timeouts.connect).map_err(|e| {
        match e.kind() {
            io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused {
                addr: addr.to_string(),
                source: e,
            },
            io::ErrorKind::TimedOut => PrintError::ConnectionTimeout {
                addr: addr.to_string(),
                timeout: config.timeouts.connect,
                source: e,
            },
            _ => PrintError::ConnectionFailed {
                addr: addr.to_string(),
                source: e,
            },
        }
    })?;

    let conn_failed = |e: io::Error| PrintError::ConnectionFailed {
        addr: addr.to_string(),
        source: e,
    };

    // TCP_NODELAY -- disable Nagle's algorithm for low-latency sends
    stream.set_nodelay(true).map_err(conn_failed)?;
    configure_keepalive(&stream, Duration::from_secs(60)).map_err(conn_failed)?;
    stream
        .set_write_timeout(Some(config.timeouts.write))
        .map_err(conn_failed)?;

    Ok(stream)
}

/// Configure TCP keepalive on a `TcpStream` via `socket2`.
fn configure_keepalive(stream: &TcpStream, interval: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(interval);

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(interval);

    SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
    Ok(())
}

//! Printer transports for label-press.
//!
//! Sends rendered ZPL documents to label printers over raw TCP (port 9100)
//! or through the operating system's print queue. The API is synchronous
//! (`std::net` / `std::process`), with no async runtime required.
#[cfg(feature = "tcp")]
mod addr;
mod config;
mod discover;
mod error;
mod queue;
mod retry;
#[cfg(feature = "tcp")]
mod tcp;

#[cfg(feature = "tcp")]
pub use addr::{DEFAULT_PORT, resolve_printer_addr};
pub use config::{PrinterConfig, PrinterTimeouts, RetryConfig};
pub use discover::{list_print_queues, preferred_queue};
pub use error::PrintError;
pub use queue::QueuePrinter;
pub use retry::RetryPrinter;
#[cfg(feature = "tcp")]
pub use tcp::TcpPrinter;

/// Send data to a printer. All transports implement this.
///
/// Transports are write-only: this crate never reads printer responses.
/// A send that returns `Ok` means the bytes were accepted by the transport
/// (socket write or spooler hand-off), not that a label was physically
/// printed.
pub trait Printer: Send {
    /// Send raw bytes to the printer.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Send a ZPL string to the printer (convenience wrapper over `send_raw`).
    fn send_zpl(&mut self, zpl: &str) -> Result<(), PrintError> {
        self.send_raw(zpl.as_bytes())
    }
}

//! Typed error types for the printer transports.

use std::io;
use std::time::Duration;

/// Printer transport error conditions, categorized by type.
///
/// Each variant carries enough context to produce a helpful error message.
/// Use [`PrintError::is_retryable()`] to classify transient vs permanent failures.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    // -- Connection --
    /// The printer actively refused the connection (e.g. port not open).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out before the printer responded.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    // -- Address --
    /// The provided address string was empty or structurally unusable.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// DNS resolution found no addresses for the given hostname.
    #[error("no address found for hostname: {0}")]
    NoAddressFound(String),

    // -- I/O --
    /// Writing data to the printer failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    // -- OS print queue --
    /// Handing a job to the OS spooler failed.
    #[error("spooler rejected job for queue {queue:?}: {details}")]
    SpoolerFailed {
        /// The print queue the job was submitted to.
        queue: String,
        /// Spooler command output or OS error text.
        details: String,
    },

    /// Enumerating system print queues failed.
    #[error("printer discovery failed: {0}")]
    DiscoveryFailed(String),

    // -- Retry --
    /// All retry attempts have been exhausted.
    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        /// Total number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last_error: Box<PrintError>,
    },

    // -- Configuration --
    /// An invalid configuration was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    /// Returns `true` if this error is transient and worth retrying.
    ///
    /// Spooler failures are deliberately not retryable: once a job reaches
    /// the OS queue its fate is the spooler's, and resubmitting risks
    /// duplicate labels.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PrintError::ConnectionTimeout { .. } | PrintError::WriteFailed(_)
        )
    }
}

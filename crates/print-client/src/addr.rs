//! Printer address resolution.
//!
//! Operators type printer addresses in several shapes: bare IP, IP with
//! port, hostname, hostname with port. Everything resolves to a single
//! `SocketAddr`, defaulting to the raw printing port 9100.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::PrintError;

/// Default raw printing port (JetDirect / RAW).
pub const DEFAULT_PORT: u16 = 9100;

/// Resolve a user-provided printer address string to a `SocketAddr`.
///
/// Accepted forms, tried in order:
/// - full socket address (`192.168.1.55:9100`, `[::1]:9100`)
/// - bare IP (`192.168.1.55`), port defaults to 9100
/// - `host:port` (`printer01.local:6101`)
/// - bare hostname (`printer01.local`), port defaults to 9100
///
/// Hostnames that resolve to multiple addresses (dual-stack) use the
/// first result.
pub fn resolve_printer_addr(input: &str) -> Result<SocketAddr, PrintError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PrintError::InvalidAddress(input.to_string()));
    }

    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    // DNS: with an explicit port first, then with the default port.
    let dns_attempts = [
        input.to_socket_addrs().ok(),
        (input, DEFAULT_PORT).to_socket_addrs().ok(),
    ];
    for addrs in dns_attempts.into_iter().flatten() {
        for addr in addrs {
            return Ok(addr);
        }
    }

    Err(PrintError::NoAddressFound(input.to_string()))
}

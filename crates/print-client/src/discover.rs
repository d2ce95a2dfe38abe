//! System print queue discovery.
//!
//! Asks the OS which print queues exist (`lpstat -a` on Unix-likes,
//! PowerShell `Get-Printer` on Windows) so an operator can pick one
//! without typing the exact spooler name. Ordering follows the OS tool's
//! output.

use crate::PrintError;

/// Queue-name markers that identify a Zebra-family label printer.
const ZEBRA_MARKERS: [&str; 2] = ["ZDesigner", "Zebra"];

/// List the names of installed system print queues.
///
/// Returns the queues in the order the OS reports them. An empty list is
/// a valid result (no printers installed); a failure to run or parse the
/// OS tool is [`PrintError::DiscoveryFailed`].
pub fn list_print_queues() -> Result<Vec<String>, PrintError> {
    let raw = query_os_queues()?;
    Ok(raw)
}

/// Pick the queue most likely to be a label printer.
///
/// Prefers the first queue whose name carries a Zebra brand marker,
/// falling back to the first queue overall. Returns `None` for an empty
/// list.
pub fn preferred_queue(queues: &[String]) -> Option<&str> {
    queues
        .iter()
        .find(|q| ZEBRA_MARKERS.iter().any(|m| q.contains(m)))
        .or_else(|| queues.first())
        .map(String::as_str)
}

#[cfg(not(windows))]
fn query_os_queues() -> Result<Vec<String>, PrintError> {
    use std::process::Command;

    let output = Command::new("lpstat")
        .arg("-a")
        .output()
        .map_err(|e| PrintError::DiscoveryFailed(format!("failed to run lpstat: {e}")))?;

    if !output.status.success() {
        return Err(PrintError::DiscoveryFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(parse_lpstat(&String::from_utf8_lossy(&output.stdout)))
}

#[cfg(windows)]
fn query_os_queues() -> Result<Vec<String>, PrintError> {
    use std::process::Command;

    let output = Command::new("powershell")
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            "Get-Printer | Select-Object -ExpandProperty Name",
        ])
        .output()
        .map_err(|e| PrintError::DiscoveryFailed(format!("failed to run powershell: {e}")))?;

    if !output.status.success() {
        return Err(PrintError::DiscoveryFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(parse_name_lines(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `lpstat -a` output. Each line reads
/// `"<queue> accepting requests since ..."`; the queue name is the first
/// whitespace-delimited field.
#[cfg_attr(windows, allow(dead_code))]
fn parse_lpstat(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Parse one queue name per line, skipping blanks (PowerShell output).
#[cfg_attr(not(windows), allow(dead_code))]
fn parse_name_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

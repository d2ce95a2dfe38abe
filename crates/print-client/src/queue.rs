//! OS print queue transport.
//!
//! Hands raw document bytes to the operating system's spooler instead of
//! talking to the printer directly. This is the right transport for
//! USB-attached printers installed as a named queue: `lp -o raw` on
//! Unix-likes, a raw `copy /b` to the printer share on Windows.

use crate::{PrintError, Printer};

/// A printer reached through a named OS print queue.
///
/// Each `send_raw` submits one spooler job. The queue name must match an
/// installed printer exactly (see [`crate::list_print_queues`]).
pub struct QueuePrinter {
    queue: String,
}

impl QueuePrinter {
    /// Create a transport for the named print queue.
    ///
    /// No validation happens here; a bad queue name surfaces as a
    /// [`PrintError::SpoolerFailed`] on the first send.
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
        }
    }

    /// The queue name jobs are submitted to.
    pub fn queue(&self) -> &str {
        &self.queue
    }
}

impl Printer for QueuePrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        spool(&self.queue, data)
    }
}

/// Submit one raw job via `lp`. The `-o raw` option stops CUPS from
/// filtering the data; ZPL must reach the device byte-for-byte.
#[cfg(not(windows))]
fn spool(queue: &str, data: &[u8]) -> Result<(), PrintError> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let io_fail = |e: std::io::Error| PrintError::SpoolerFailed {
        queue: queue.to_string(),
        details: e.to_string(),
    };

    let mut child = Command::new("lp")
        .args(["-d", queue, "-o", "raw", "-s", "--", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(io_fail)?;

    // stdin handle must be dropped before wait, or lp blocks on EOF.
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(data).map_err(io_fail)?;
    }

    let output = child.wait_with_output().map_err(io_fail)?;
    if !output.status.success() {
        return Err(PrintError::SpoolerFailed {
            queue: queue.to_string(),
            details: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Submit one raw job by copying a temp file to the printer share.
/// `copy /b` is the reliable way to push raw bytes at a Windows queue.
#[cfg(windows)]
fn spool(queue: &str, data: &[u8]) -> Result<(), PrintError> {
    use std::process::Command;

    let fail = |details: String| PrintError::SpoolerFailed {
        queue: queue.to_string(),
        details,
    };

    let temp_path = std::env::temp_dir().join("label_press_job.zpl");
    std::fs::write(&temp_path, data).map_err(|e| fail(e.to_string()))?;

    let destination = format!("\\\\localhost\\{queue}");
    let command = format!("copy /b \"{}\" \"{}\"", temp_path.display(), destination);
    let output = Command::new("cmd")
        .args(["/c", &command])
        .output()
        .map_err(|e| fail(e.to_string()))?;

    let _ = std::fs::remove_file(&temp_path);

    if !output.status.success() {
        return Err(fail(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_name_round_trips() {
        let printer = QueuePrinter::new("ZDesigner GK420d");
        assert_eq!(printer.queue(), "ZDesigner GK420d");
    }

    #[test]
    fn missing_queue_reports_spooler_failure() {
        // Either lp is absent or the queue does not exist; both must map
        // to SpoolerFailed rather than panic or hang.
        let mut printer = QueuePrinter::new("label-press-no-such-queue");
        match printer.send_raw(b"^XA^XZ") {
            Err(PrintError::SpoolerFailed { queue, .. }) => {
                assert_eq!(queue, "label-press-no-such-queue");
            }
            Ok(()) => {} // a queue by this name actually exists; nothing to assert
            other => panic!("expected SpoolerFailed, got {:?}", other),
        }
    }
}

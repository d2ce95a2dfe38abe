//! Retry wrapper that adds exponential-backoff retry logic to any `Printer`.

use std::time::{Duration, SystemTime};

use crate::config::RetryConfig;
use crate::{PrintError, Printer};

/// A wrapper that adds retry-with-backoff to any `Printer` implementation.
///
/// Retries happen on the **same underlying connection**: this is for
/// transient faults (brief network hiccups, printer busy) where the
/// stream stays valid. After a full connection drop, reconnect at the
/// call site (e.g. [`TcpPrinter::reconnect()`](crate::TcpPrinter::reconnect))
/// instead of relying on `RetryPrinter` alone.
///
/// Only errors classified retryable by [`PrintError::is_retryable()`]
/// are retried; anything else returns immediately.
pub struct RetryPrinter<P> {
    inner: P,
    retry_config: RetryConfig,
}

impl<P> RetryPrinter<P> {
    /// Create a new `RetryPrinter` wrapping `inner` with the given retry configuration.
    pub fn new(inner: P, retry_config: RetryConfig) -> Self {
        Self {
            inner,
            retry_config,
        }
    }

    /// Unwrap the `RetryPrinter`, returning the inner printer.
    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Get a shared reference to the inner printer.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get a mutable reference to the inner printer.
    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }
}

impl<P: Printer> Printer for RetryPrinter<P> {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        retry_op(&self.retry_config, || self.inner.send_raw(data))
    }
}

// ── Retry helper ───────────────────────────────────────────────────────

/// Execute `op`, retrying on retryable errors with exponential backoff.
///
/// Non-retryable errors are returned immediately. On exhausting all attempts
/// the last retryable error is wrapped in [`PrintError::RetriesExhausted`].
fn retry_op<T, F>(config: &RetryConfig, mut op: F) -> Result<T, PrintError>
where
    F: FnMut() -> Result<T, PrintError>,
{
    if config.max_attempts == 0 {
        return Err(PrintError::InvalidConfig(
            "max_attempts must be >= 1".into(),
        ));
    }

    let mut last_error: Option<PrintError> = None;

    for attempt in 0..config.max_attempts {
        match op() {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !e.is_retryable() {
                    return Err(e);
                }
                last_error = Some(e);

                // Don't sleep after the last attempt.
                if attempt + 1 < config.max_attempts {
                    std::thread::sleep(compute_delay(config, attempt));
                }
            }
        }
    }

    // We only reach here when every attempt failed with a retryable error.
    Err(PrintError::RetriesExhausted {
        attempts: config.max_attempts,
        last_error: Box::new(last_error.unwrap_or_else(|| {
            unreachable!("at least one attempt was made (max_attempts >= 1)")
        })),
    })
}

/// Compute the backoff delay for the given `attempt` (0-indexed).
///
/// delay = min(initial_delay * 2^attempt, max_delay), optionally with jitter.
fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config
        .initial_delay
        .saturating_mul(2u32.saturating_pow(attempt));
    let capped = base.min(config.max_delay);

    if config.jitter {
        // Simple jitter in [capped/2, capped] seeded from the system clock;
        // no need to pull in a RNG crate for this.
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let half = capped / 2;
        let spread = capped.saturating_sub(half);
        let fraction = f64::from(nanos % 1_000_000) / 1_000_000.0;
        half + spread.mul_f64(fraction)
    } else {
        capped
    }
}

//! Batch dispatch: render per item, send per copy, report counts.
//!
//! Dispatch is the only pipeline stage with external effects, and it is
//! strictly sequential: copies leave in item order because the physical
//! label ejection order must match the table row order. Cancellation is
//! honored only at item boundaries — never mid-transmission of a copy.

use std::ops::ControlFlow;

use label_press_print_client::{PrintError, Printer};
use serde::Serialize;

use crate::table::ResolvedItem;
use crate::template::{LabelFields, render};

/// Progress snapshot handed to the batch callback after each item.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// Items handled so far (printed or skipped).
    pub items_done: usize,
    /// Labels sent so far.
    pub labels_sent: usize,
    /// Total items in the batch.
    pub total_items: usize,
}

/// Outcome counts for a batch run.
///
/// A cancelled batch returns the counts accumulated up to the last
/// completed item; sent labels are never rolled back.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Items for which all requested copies were sent.
    pub items_printed: usize,
    /// Total label copies sent.
    pub labels_printed: usize,
    /// Items skipped for a non-positive or unparsable quantity.
    pub items_skipped: usize,
    /// Total items in the batch.
    pub total_items: usize,
}

/// A batch aborted by a transport failure.
///
/// Carries the offending item's name and the counts from before the
/// failure; copies already sent stay sent (printing has no undo).
#[derive(Debug, thiserror::Error)]
#[error("printing failed on {item_name:?} after {items_printed} items ({labels_sent} labels sent)")]
pub struct DispatchError {
    /// Name of the item whose copy failed to send.
    pub item_name: String,
    /// Items fully printed before the failure.
    pub items_printed: usize,
    /// Labels sent before the failure, including partial copies of the
    /// failing item.
    pub labels_sent: usize,
    /// The transport error that aborted the batch.
    #[source]
    pub source: PrintError,
}

/// Print a batch of resolved items through `printer`.
///
/// Each item's quantity is parsed here; unparsable or non-positive
/// quantities skip the item silently (counted in the report, never an
/// error — bad cells must not sink the batch). Printable items render
/// once and send the identical document `qty` times.
///
/// `on_progress` runs after every item and may return
/// `ControlFlow::Break(())` to cancel; the partial report is returned.
/// The first transport failure aborts with [`DispatchError`].
pub fn dispatch_batch<P, F>(
    printer: &mut P,
    template: &str,
    items: &[ResolvedItem],
    mut on_progress: F,
) -> Result<BatchReport, DispatchError>
where
    P: Printer + ?Sized,
    F: FnMut(BatchProgress) -> ControlFlow<(), ()>,
{
    let mut report = BatchReport {
        total_items: items.len(),
        ..BatchReport::default()
    };

    for item in items {
        match parse_quantity(&item.qty) {
            Some(qty) => {
                let document = render(template, &LabelFields::from(item));

                for _ in 0..qty {
                    printer
                        .send_zpl(&document)
                        .map_err(|source| DispatchError {
                            item_name: item.item_name.clone(),
                            items_printed: report.items_printed,
                            labels_sent: report.labels_printed,
                            source,
                        })?;
                    report.labels_printed += 1;
                }
                report.items_printed += 1;
            }
            None => report.items_skipped += 1,
        }

        let progress = BatchProgress {
            items_done: report.items_printed + report.items_skipped,
            labels_sent: report.labels_printed,
            total_items: report.total_items,
        };
        if let ControlFlow::Break(()) = on_progress(progress) {
            return Ok(report);
        }
    }

    Ok(report)
}

/// Parse a quantity cell into a printable copy count.
///
/// Returns `None` for anything that isn't a positive integer; resolution
/// already defaulted empty cells to `"1"`, so `None` here means the
/// operator typed something else and the item is skipped.
fn parse_quantity(raw: &str) -> Option<u64> {
    match raw.parse::<i64>() {
        Ok(qty) if qty > 0 => Some(qty as u64),
        _ => None,
    }
}

//! Session object for one print run.
//!
//! The loaded table, the operator's column mapping, and the template
//! travel together in an explicit [`LabelSession`] value — nothing in
//! the pipeline reads ambient state, so two sessions can run side by
//! side without touching each other.

use std::ops::ControlFlow;

use label_press_print_client::Printer;

use crate::dispatch::{BatchProgress, BatchReport, DispatchError, dispatch_batch};
use crate::table::{FieldMapping, MappingError, ResolvedItem, Table};
use crate::template::{LabelFields, render};

/// Everything one print run needs: data, mapping, template.
#[derive(Debug, Clone)]
pub struct LabelSession {
    /// The loaded product table.
    pub table: Table,
    /// The operator's column mapping.
    pub mapping: FieldMapping,
    /// The raw label template.
    pub template: String,
}

impl LabelSession {
    /// Create a session from its parts.
    pub fn new(table: Table, mapping: FieldMapping, template: impl Into<String>) -> Self {
        Self {
            table,
            mapping,
            template: template.into(),
        }
    }

    /// Resolve every row of the table into items.
    ///
    /// Fails up front if required fields are unmapped; per-row data
    /// problems never fail (short rows resolve to empty fields).
    pub fn resolve_items(&self) -> Result<Vec<ResolvedItem>, MappingError> {
        let indices = self.mapping.column_indices(&self.table.headers)?;
        Ok(self
            .table
            .rows
            .iter()
            .map(|row| indices.resolve(row))
            .collect())
    }

    /// Render every row into an independent label document.
    ///
    /// Useful for dry runs and file output; quantities are ignored here
    /// (each row renders exactly once).
    pub fn render_all(&self) -> Result<Vec<String>, MappingError> {
        Ok(self
            .resolve_items()?
            .iter()
            .map(|item| render(&self.template, &LabelFields::from(item)))
            .collect())
    }

    /// Resolve, render, and print the whole table through `printer`.
    ///
    /// See [`dispatch_batch`] for quantity, ordering, cancellation, and
    /// failure semantics.
    pub fn print<P, F>(&self, printer: &mut P, on_progress: F) -> Result<BatchReport, SessionError>
    where
        P: Printer + ?Sized,
        F: FnMut(BatchProgress) -> ControlFlow<(), ()>,
    {
        let items = self.resolve_items()?;
        let report = dispatch_batch(printer, &self.template, &items, on_progress)?;
        Ok(report)
    }
}

/// Errors from a full session run.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The mapping is missing required fields; nothing was printed.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// A transport failure aborted the batch partway.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_press_print_client::PrintError;

    struct CountingPrinter {
        sent: usize,
    }

    impl Printer for CountingPrinter {
        fn send_raw(&mut self, _data: &[u8]) -> Result<(), PrintError> {
            self.sent += 1;
            Ok(())
        }
    }

    fn sample_session() -> LabelSession {
        let table = Table::new(
            vec!["Item Name".into(), "Price".into(), "SKU".into(), "Stock".into()],
            vec![
                vec!["Widget".into(), "9.99".into(), "123456".into(), "2".into()],
                vec!["Gadget".into(), "4.50".into(), "ABC123".into(), "0".into()],
            ],
        );
        let mapping = FieldMapping::guess(&table.headers);
        LabelSession::new(table, mapping, "^XA^FD{{item_name}}^FS^XZ")
    }

    #[test]
    fn resolves_all_rows() {
        let items = sample_session().resolve_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_name, "Widget");
        assert_eq!(items[0].qty, "2");
        assert_eq!(items[1].qty, "0");
    }

    #[test]
    fn empty_table_resolves_to_empty_batch() {
        let mut session = sample_session();
        session.table.rows.clear();
        assert!(session.resolve_items().unwrap().is_empty());
    }

    #[test]
    fn render_all_ignores_quantities() {
        let docs = sample_session().render_all().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], "^XA^FDWidget^FS^XZ");
        assert_eq!(docs[1], "^XA^FDGadget^FS^XZ");
    }

    #[test]
    fn print_applies_quantity_policy() {
        let mut printer = CountingPrinter { sent: 0 };
        let report = sample_session()
            .print(&mut printer, |_| ControlFlow::Continue(()))
            .unwrap();
        // Widget prints twice, Gadget (qty 0) is skipped.
        assert_eq!(printer.sent, 2);
        assert_eq!(report.labels_printed, 2);
        assert_eq!(report.items_skipped, 1);
    }

    #[test]
    fn incomplete_mapping_blocks_the_run() {
        let mut session = sample_session();
        session.mapping.sku_id = None;
        let mut printer = CountingPrinter { sent: 0 };
        match session.print(&mut printer, |_| ControlFlow::Continue(())) {
            Err(SessionError::Mapping(MappingError::NotFullyMapped { missing })) => {
                assert_eq!(missing, vec!["sku_id"]);
            }
            other => panic!("expected mapping error, got {:?}", other),
        }
        assert_eq!(printer.sent, 0);
    }
}

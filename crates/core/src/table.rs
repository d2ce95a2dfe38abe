//! Table model, column mapping, and per-row field resolution.
//!
//! A [`Table`] is whatever the CSV loader produced: ordered headers plus
//! ordered rows of string cells. A [`FieldMapping`] says which header
//! feeds which logical label field. Resolution combines the two into
//! [`ResolvedItem`]s that the renderer and dispatcher consume.

use serde::Serialize;

/// Logical field names, in the order they are reported when missing.
const REQUIRED_FIELDS: [&str; 3] = ["item_name", "price", "sku_id"];

/// Tabular input: a header row plus data rows.
///
/// Headers are not required to be unique, and rows are not required to
/// match the header count — short rows resolve missing cells to empty
/// strings. A table with headers and zero rows is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Ordered column header names.
    pub headers: Vec<String>,
    /// Ordered data rows; each row is an ordered sequence of string cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// User-chosen mapping from logical label fields to header names.
///
/// `item_name`, `price`, and `sku_id` must all be mapped before any row
/// can resolve; `qty` is optional and defaults every row's quantity to 1
/// when unmapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    /// Header carrying the product name.
    pub item_name: Option<String>,
    /// Header carrying the display price.
    pub price: Option<String>,
    /// Header carrying the barcode identifier.
    pub sku_id: Option<String>,
    /// Header carrying the per-row label quantity, if any.
    pub qty: Option<String>,
}

impl FieldMapping {
    /// Pre-populate a mapping from well-known header names.
    ///
    /// Matches the conventional spreadsheet headers (`Item Name`,
    /// `Price`, `SKU`, `Stock`/`Quantity`) and their snake_case forms.
    /// Fields with no recognized header stay unmapped for the operator
    /// to fill in.
    pub fn guess(headers: &[String]) -> Self {
        let find = |candidates: &[&str]| {
            headers
                .iter()
                .find(|h| candidates.contains(&h.as_str()))
                .cloned()
        };
        Self {
            item_name: find(&["Item Name", "item_name"]),
            price: find(&["Price", "price"]),
            sku_id: find(&["SKU", "sku_id"]),
            qty: find(&["Stock", "Quantity", "qty"]),
        }
    }

    /// Check that every required field is mapped.
    ///
    /// Callers must not resolve rows until this passes; the UI contract
    /// is to show empty state, not partial labels.
    pub fn require_complete(&self) -> Result<(), MappingError> {
        let mapped = [&self.item_name, &self.price, &self.sku_id];
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .zip(mapped)
            .filter(|(_, m)| m.is_none())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MappingError::NotFullyMapped { missing })
        }
    }

    /// Resolve mapped header names to column indices.
    ///
    /// Lookup is case-sensitive exact match; when headers repeat, the
    /// first match wins. A mapped header absent from `headers` yields no
    /// index, which resolves to empty cell values rather than an error.
    pub fn column_indices(&self, headers: &[String]) -> Result<ColumnIndices, MappingError> {
        self.require_complete()?;

        let position =
            |mapped: &Option<String>| mapped.as_ref().and_then(|h| headers.iter().position(|x| x == h));

        Ok(ColumnIndices {
            item_name: position(&self.item_name),
            price: position(&self.price),
            sku_id: position(&self.sku_id),
            qty: position(&self.qty),
        })
    }
}

/// Column positions resolved from a [`FieldMapping`] against one header
/// row. Compute once per batch, reuse for every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    /// Column index of the product name, if the header was found.
    pub item_name: Option<usize>,
    /// Column index of the price, if the header was found.
    pub price: Option<usize>,
    /// Column index of the barcode identifier, if the header was found.
    pub sku_id: Option<usize>,
    /// Column index of the quantity, if mapped and found.
    pub qty: Option<usize>,
}

impl ColumnIndices {
    /// Resolve one row into its logical field values.
    ///
    /// Total: out-of-range indices and unresolved columns read as empty
    /// strings. Quantity keeps the raw cell string (validation happens
    /// at dispatch); an empty or missing quantity cell defaults to `"1"`.
    pub fn resolve(&self, row: &[String]) -> ResolvedItem {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(String::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let qty = match cell(self.qty) {
            q if q.is_empty() => "1".to_string(),
            q => q,
        };

        ResolvedItem {
            item_name: cell(self.item_name),
            price: cell(self.price),
            sku_id: cell(self.sku_id),
            qty,
        }
    }
}

/// One row's logical field values plus its requested label quantity.
///
/// `qty` stays a raw string here: the dispatcher decides whether it
/// parses to a printable count. Value type, no shared state — safe to
/// build concurrently across rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedItem {
    /// Product name shown on the label.
    pub item_name: String,
    /// Display price shown on the label.
    pub price: String,
    /// Barcode identifier.
    pub sku_id: String,
    /// Requested copy count, verbatim from the cell (or `"1"`).
    pub qty: String,
}

/// Resolve a single row against headers and a mapping.
///
/// Convenience wrapper over [`FieldMapping::column_indices`] +
/// [`ColumnIndices::resolve`] for one-off use; batch callers should
/// precompute the indices.
pub fn resolve_row(
    headers: &[String],
    mapping: &FieldMapping,
    row: &[String],
) -> Result<ResolvedItem, MappingError> {
    Ok(mapping.column_indices(headers)?.resolve(row))
}

/// Errors from mapping configuration.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// One or more required logical fields have no header mapped.
    #[error("required fields not mapped: {}", missing.join(", "))]
    NotFullyMapped {
        /// The logical field names still unmapped.
        missing: Vec<&'static str>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn full_mapping() -> FieldMapping {
        FieldMapping {
            item_name: Some("Item Name".into()),
            price: Some("Price".into()),
            sku_id: Some("SKU".into()),
            qty: None,
        }
    }

    #[test]
    fn basic_resolution_scenario() {
        let headers = headers(&["Item Name", "Price", "SKU"]);
        let item = resolve_row(&headers, &full_mapping(), &row(&["Widget", "9.99", "123456"]))
            .unwrap();
        assert_eq!(
            item,
            ResolvedItem {
                item_name: "Widget".into(),
                price: "9.99".into(),
                sku_id: "123456".into(),
                qty: "1".into(),
            }
        );
    }

    #[test]
    fn unmapped_required_fields_are_reported() {
        let mapping = FieldMapping {
            item_name: Some("Item Name".into()),
            ..FieldMapping::default()
        };
        match mapping.require_complete() {
            Err(MappingError::NotFullyMapped { missing }) => {
                assert_eq!(missing, vec!["price", "sku_id"]);
            }
            other => panic!("expected NotFullyMapped, got {:?}", other),
        }
    }

    #[test]
    fn short_row_resolves_to_empty_strings() {
        let headers = headers(&["Item Name", "Price", "SKU"]);
        let item = resolve_row(&headers, &full_mapping(), &row(&["Widget"])).unwrap();
        assert_eq!(item.item_name, "Widget");
        assert_eq!(item.price, "");
        assert_eq!(item.sku_id, "");
    }

    #[test]
    fn empty_row_never_errors() {
        let headers = headers(&["Item Name", "Price", "SKU"]);
        let item = resolve_row(&headers, &full_mapping(), &[]).unwrap();
        assert_eq!(item.item_name, "");
        assert_eq!(item.qty, "1");
    }

    #[test]
    fn mapped_header_missing_from_table_reads_empty() {
        let headers = headers(&["Name", "Price", "SKU"]); // no "Item Name"
        let item = resolve_row(&headers, &full_mapping(), &row(&["Widget", "9.99", "123"]))
            .unwrap();
        assert_eq!(item.item_name, "");
        assert_eq!(item.price, "9.99");
    }

    #[test]
    fn duplicate_headers_first_match_wins() {
        let headers = headers(&["SKU", "Price", "SKU", "Item Name"]);
        let mapping = FieldMapping {
            item_name: Some("Item Name".into()),
            price: Some("Price".into()),
            sku_id: Some("SKU".into()),
            qty: None,
        };
        let item =
            resolve_row(&headers, &mapping, &row(&["first", "1.00", "second", "W"])).unwrap();
        assert_eq!(item.sku_id, "first");
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let headers = headers(&["item name", "Price", "SKU"]);
        let item = resolve_row(&headers, &full_mapping(), &row(&["Widget", "9.99", "123"]))
            .unwrap();
        // "Item Name" does not match "item name".
        assert_eq!(item.item_name, "");
    }

    #[test]
    fn qty_cell_kept_verbatim_when_present() {
        let headers = headers(&["Item Name", "Price", "SKU", "Stock"]);
        let mapping = FieldMapping {
            qty: Some("Stock".into()),
            ..full_mapping()
        };
        let indices = mapping.column_indices(&headers).unwrap();

        let item = indices.resolve(&row(&["Widget", "9.99", "123", "5"]));
        assert_eq!(item.qty, "5");

        // Unparsable stays verbatim here; the dispatcher decides its fate.
        let item = indices.resolve(&row(&["Widget", "9.99", "123", "lots"]));
        assert_eq!(item.qty, "lots");

        // Empty defaults.
        let item = indices.resolve(&row(&["Widget", "9.99", "123", ""]));
        assert_eq!(item.qty, "1");

        // Out of range defaults.
        let item = indices.resolve(&row(&["Widget", "9.99", "123"]));
        assert_eq!(item.qty, "1");
    }

    #[test]
    fn guess_finds_conventional_headers() {
        let headers = headers(&["Item Name", "Price", "SKU", "Stock"]);
        let mapping = FieldMapping::guess(&headers);
        assert_eq!(mapping.item_name.as_deref(), Some("Item Name"));
        assert_eq!(mapping.price.as_deref(), Some("Price"));
        assert_eq!(mapping.sku_id.as_deref(), Some("SKU"));
        assert_eq!(mapping.qty.as_deref(), Some("Stock"));
        assert!(mapping.require_complete().is_ok());
    }

    #[test]
    fn guess_leaves_unknown_headers_unmapped() {
        let headers = headers(&["col_a", "col_b"]);
        let mapping = FieldMapping::guess(&headers);
        assert_eq!(mapping, FieldMapping::default());
        assert!(mapping.require_complete().is_err());
    }

    #[test]
    fn guess_snake_case_variants() {
        let headers = headers(&["item_name", "price", "sku_id", "qty"]);
        let mapping = FieldMapping::guess(&headers);
        assert!(mapping.require_complete().is_ok());
        assert_eq!(mapping.qty.as_deref(), Some("qty"));
    }
}

//! Label-press core library.
//!
//! Turns tabular product data into printer-ready ZPL documents. The
//! pipeline runs one pass per table row: resolve the row against a user
//! column mapping ([`resolve_row`]), estimate barcode geometry
//! ([`estimate_code128_width`]), render the label template with
//! injection-safe substitution ([`render`]), and hand the copies to a
//! printer transport ([`dispatch_batch`]).
//!
//! Resolution, geometry, and rendering are total, side-effect-free
//! functions over immutable inputs; only dispatch touches the outside
//! world.

#![warn(missing_docs)]

/// Code 128 width estimation and module-width selection.
pub mod barcode;
/// Batch dispatch: quantity handling, sequential sends, progress reporting.
pub mod dispatch;
/// Free-text sanitization for ZPL field data.
pub mod sanitize;
/// Session object bundling a loaded table, mapping, and template.
pub mod session;
/// Table model, column mapping, and per-row field resolution.
pub mod table;
/// Label template loading and `{{token}}` rendering.
pub mod template;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

pub use barcode::{ModuleWidth, estimate_code128_width, module_width_for};
pub use dispatch::{BatchProgress, BatchReport, DispatchError, dispatch_batch};
pub use sanitize::sanitize_field;
pub use session::LabelSession;
pub use table::{FieldMapping, MappingError, ResolvedItem, Table, resolve_row};
pub use template::{FALLBACK_TEMPLATE, LabelFields, load_template, render};

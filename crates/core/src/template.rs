//! Label template loading and `{{token}}` rendering.
//!
//! Templates are ordinary ZPL documents with `{{name}}` placeholder
//! tokens. Rendering derives the barcode geometry tokens (`by`,
//! `barcode_x`) from the item's identifier, sanitizes the free-text
//! fields, and substitutes every token in a single left-to-right scan.
//! Substituted values are never rescanned, so data can't smuggle tokens
//! (or, after sanitization, commands) into the output.

use std::fs;
use std::io;
use std::path::Path;

use crate::barcode::{estimate_code128_width, module_width_for};
use crate::sanitize::sanitize_field;
use crate::table::ResolvedItem;

/// Printable label width in dots (48 mm stock at 8 dots/mm).
pub const LABEL_WIDTH_DOTS: i64 = 384;

/// Placeholder-free document used when a template fails to load.
pub const FALLBACK_TEMPLATE: &str = "^XA^FDError Loading Template^FS^XZ";

/// The free-text field values substituted into a template.
///
/// A closed record rather than an open map: the token set is part of the
/// wire format (`item_name`, `price`, `sku_id`, plus the derived `by`
/// and `barcode_x`), and a fixed record makes a missing field a type
/// error instead of a runtime lookup miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelFields {
    /// Product name (free text, sanitized on render).
    pub item_name: String,
    /// Display price (free text, sanitized on render).
    pub price: String,
    /// Barcode identifier; also drives the geometry tokens.
    pub sku_id: String,
}

impl From<&ResolvedItem> for LabelFields {
    fn from(item: &ResolvedItem) -> Self {
        Self {
            item_name: item.item_name.clone(),
            price: item.price.clone(),
            sku_id: item.sku_id.clone(),
        }
    }
}

/// Render a template into a complete label document.
///
/// Steps, in order:
/// 1. pick the module width from the raw `sku_id` length (`{{by}}`);
/// 2. estimate the barcode width at that module width;
/// 3. center it: `{{barcode_x}} = max(0, (384 - width) / 2)`;
/// 4. sanitize the free-text fields;
/// 5. substitute tokens in one left-to-right pass.
///
/// Unknown tokens pass through verbatim, repeated tokens all substitute,
/// and an empty template renders to an empty string. Deterministic and
/// total: no input can make this fail.
pub fn render(template: &str, fields: &LabelFields) -> String {
    let module = module_width_for(&fields.sku_id);
    let barcode_width = i64::from(estimate_code128_width(&fields.sku_id, module.dots()));
    let barcode_x = ((LABEL_WIDTH_DOTS - barcode_width) / 2).max(0).to_string();

    let item_name = sanitize_field(&fields.item_name);
    let price = sanitize_field(&fields.price);
    let sku_id = sanitize_field(&fields.sku_id);

    substitute(template, |name| match name {
        "by" => Some(module.token()),
        "barcode_x" => Some(&barcode_x),
        "item_name" => Some(&item_name),
        "price" => Some(&price),
        "sku_id" => Some(&sku_id),
        _ => None,
    })
}

/// Substitute `{{name}}` tokens in a single left-to-right scan.
///
/// `lookup` returning `None` leaves the token literal in the output.
/// Values are copied, never rescanned — a `{{...}}` inside a value stays
/// inert text.
fn substitute<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(close) = after_open.find("}}") else {
            // Unterminated token: everything from the braces on is literal.
            out.push_str(&rest[start..]);
            return out;
        };

        match lookup(&after_open[..close]) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}

// ── Template loading ───────────────────────────────────────────────────

/// Read a template file, stripping a UTF-8 BOM if present.
///
/// Label templates exported from Windows tools often carry a BOM, which
/// would otherwise land in front of the first `^XA`.
pub fn read_template(path: &Path) -> io::Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .strip_prefix('\u{FEFF}')
        .map(str::to_string)
        .unwrap_or(content))
}

/// Load a template file, falling back to [`FALLBACK_TEMPLATE`] on any
/// read failure. The fallback contains no placeholders, so a broken
/// template path prints an unmistakable error label instead of garbage.
pub fn load_template(path: &Path) -> String {
    read_template(path).unwrap_or_else(|_| FALLBACK_TEMPLATE.to_string())
}

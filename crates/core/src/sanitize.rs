//! Free-text sanitization for ZPL field data.
//!
//! `^` and `~` open ZPL commands, and ZPL records are line-oriented, so a
//! data value carrying any of them could inject structural commands into
//! the rendered document or split a record. Sanitization makes arbitrary
//! cell content safe to substitute into a template.

/// Sanitize a free-text value for substitution into a ZPL template.
///
/// Strips every `^` and `~`, folds each CR and LF into a single space,
/// then trims surrounding whitespace. Idempotent: sanitizing an already
/// sanitized string returns it unchanged.
///
/// Applies to operator data only — derived numeric tokens (module width,
/// centering offset) are rendered from integers and bypass this.
pub fn sanitize_field(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter_map(|c| match c {
            '^' | '~' => None,
            '\r' | '\n' => Some(' '),
            other => Some(other),
        })
        .collect();
    cleaned.trim().to_string()
}

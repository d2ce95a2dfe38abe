//! Code 128 width estimation and module-width selection.
//!
//! This is a packing heuristic, not an encoder. Real Code 128 switches
//! subsets dynamically; for layout purposes we only need to know roughly
//! how wide the printed symbol will be, assuming subset C packing for
//! all-digit content and one symbol per character otherwise. The printer
//! does the actual encoding.

/// Fixed symbol overhead in modules: start (11) + check (11) + stop (13).
const OVERHEAD_MODULES: u32 = 35;

/// Modules per Code 128 symbol.
const MODULES_PER_SYMBOL: u32 = 11;

/// Identifiers longer than this (in code points) get the narrow module
/// width so the barcode still fits the label.
const LONG_CONTENT_THRESHOLD: usize = 12;

/// Width of the narrowest bar/space element, in printer dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleWidth {
    /// 1-dot modules, used for long content.
    Narrow,
    /// 2-dot modules, the default.
    Normal,
}

impl ModuleWidth {
    /// Module width in dots.
    pub fn dots(self) -> u32 {
        match self {
            ModuleWidth::Narrow => 1,
            ModuleWidth::Normal => 2,
        }
    }

    /// The value the `^BY` template token expands to.
    pub fn token(self) -> &'static str {
        match self {
            ModuleWidth::Narrow => "1",
            ModuleWidth::Normal => "2",
        }
    }
}

/// Choose the module width for the given barcode content.
///
/// Content longer than 12 code points drops to 1-dot modules; otherwise
/// 2-dot modules are used. Counted in code points, not bytes, so
/// multi-byte identifiers don't shrink early.
pub fn module_width_for(content: &str) -> ModuleWidth {
    if content.chars().count() > LONG_CONTENT_THRESHOLD {
        ModuleWidth::Narrow
    } else {
        ModuleWidth::Normal
    }
}

/// Estimate the printed width in dots of a Code 128 barcode.
///
/// All-digit content of length >= 2 is assumed to pack subset-C style,
/// two digits per 11-module symbol (`ceil(len / 2) * 11`); anything else
/// costs 11 modules per character. A fixed 35-module overhead covers the
/// start, check, and stop symbols. The result is
/// `(35 + data_modules) * module_width`.
///
/// Callers that need this estimate to match the rendered `^BY` value
/// should pass `module_width_for(content).dots()`.
pub fn estimate_code128_width(content: &str, module_width: u32) -> u32 {
    let len = u32::try_from(content.chars().count()).unwrap_or(u32::MAX);
    let numeric = !content.is_empty() && content.chars().all(|c| c.is_ascii_digit());

    let data_modules = if numeric && len >= 2 {
        // Two digits per symbol, odd tail rounds up to a full symbol.
        len.div_ceil(2) * MODULES_PER_SYMBOL
    } else {
        len * MODULES_PER_SYMBOL
    };

    (OVERHEAD_MODULES + data_modules) * module_width
}

mod input;

use std::fs;
use std::io::{self, IsTerminal};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use label_press_core::template::read_template;
use label_press_core::{FALLBACK_TEMPLATE, FieldMapping, LabelSession};
use label_press_print_client::{
    PrintError, Printer, PrinterConfig, QueuePrinter, RetryPrinter, TcpPrinter, list_print_queues,
    preferred_queue,
};

/// Default 50x30 mm label template baked into the binary.
const DEFAULT_TEMPLATE: &str = include_str!("../templates/label_50x30.zpl");

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "labelpress",
    version,
    about = "labelpress — render and batch-print ZPL product labels from CSV data"
)]
struct Cli {
    /// Output mode: "pretty" for human-readable terminal output, "json"
    /// for machine-readable JSON. Defaults to "pretty" when stdout is a
    /// TTY, "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Column-mapping flags shared by `render` and `print`.
///
/// Any flag left out is auto-detected from conventional header names
/// (`Item Name`, `Price`, `SKU`, `Stock`/`Quantity`).
#[derive(Args, Debug)]
struct MappingArgs {
    /// Header of the column holding item names.
    #[arg(long, value_name = "HEADER")]
    item_col: Option<String>,

    /// Header of the column holding prices.
    #[arg(long, value_name = "HEADER")]
    price_col: Option<String>,

    /// Header of the column holding barcode SKUs.
    #[arg(long, value_name = "HEADER")]
    sku_col: Option<String>,

    /// Header of the column holding per-row label quantities
    /// (every row defaults to 1 when omitted and not auto-detected).
    #[arg(long, value_name = "HEADER")]
    qty_col: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render label documents to stdout or files without printing.
    Render {
        /// CSV file with a header row.
        csv: String,
        /// Label template file; uses the built-in 50x30 template when omitted.
        #[arg(long)]
        template: Option<String>,
        #[command(flatten)]
        mapping: MappingArgs,
        /// Write one numbered .zpl file per row into this directory
        /// instead of stdout.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<String>,
    },

    /// Resolve, render, and print every row at its requested quantity.
    Print {
        /// CSV file with a header row.
        csv: String,
        /// Label template file; uses the built-in 50x30 template when omitted.
        #[arg(long)]
        template: Option<String>,
        #[command(flatten)]
        mapping: MappingArgs,
        /// Network printer address: IP[:PORT] or hostname[:PORT], port
        /// defaults to 9100.
        #[arg(long, value_name = "ADDR", conflicts_with = "queue")]
        printer: Option<String>,
        /// OS print queue name (see `labelpress printers`).
        #[arg(long, value_name = "NAME")]
        queue: Option<String>,
        /// Go through the full pipeline but send nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// List system print queues, marking the likely label printer.
    Printers,
}

// ── Output format ───────────────────────────────────────────────────────

/// Output format for results and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Pretty,
    Json,
}

impl Format {
    /// Resolve the `--output` flag, defaulting on whether stdout is a TTY.
    fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Render {
            csv,
            template,
            mapping,
            out_dir,
        } => cmd_render(
            &csv,
            template.as_deref(),
            &mapping,
            out_dir.as_deref(),
            format,
        ),
        Cmd::Print {
            csv,
            template,
            mapping,
            printer,
            queue,
            dry_run,
        } => cmd_print(
            &csv,
            template.as_deref(),
            &mapping,
            printer.as_deref(),
            queue.as_deref(),
            dry_run,
            format,
        ),
        Cmd::Printers => cmd_printers(format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_render(
    csv: &str,
    template: Option<&str>,
    mapping: &MappingArgs,
    out_dir: Option<&str>,
    format: Format,
) -> Result<()> {
    let session = build_session(csv, template, mapping)?;
    let documents = session.render_all()?;

    match out_dir {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            fs::create_dir_all(&dir)
                .with_context(|| format!("could not create output directory {}", dir.display()))?;
            for (i, doc) in documents.iter().enumerate() {
                let path = dir.join(format!("label_{:04}.zpl", i + 1));
                fs::write(&path, doc)
                    .with_context(|| format!("could not write {}", path.display()))?;
            }
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "written": documents.len(),
                        "dir": dir.display().to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => {
                    eprintln!("wrote {} label(s) to {}", documents.len(), dir.display());
                }
            }
        }
        None => match format {
            Format::Json => {
                let out = serde_json::json!({ "documents": documents });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Format::Pretty => {
                for doc in &documents {
                    println!("{doc}");
                }
            }
        },
    }

    Ok(())
}

fn cmd_print(
    csv: &str,
    template: Option<&str>,
    mapping: &MappingArgs,
    printer: Option<&str>,
    queue: Option<&str>,
    dry_run: bool,
    format: Format,
) -> Result<()> {
    let session = build_session(csv, template, mapping)?;
    let continue_all = |_| ControlFlow::Continue(());

    let report = if dry_run {
        let mut sink = NullPrinter;
        session.print(&mut sink, continue_all)?
    } else if let Some(addr) = printer {
        let config = PrinterConfig::default();
        let retry = config.retry.clone();
        let tcp = TcpPrinter::connect(addr, config)
            .with_context(|| format!("could not connect to printer at {addr}"))?;
        let mut printer = RetryPrinter::new(tcp, retry);
        session.print(&mut printer, continue_all)?
    } else if let Some(name) = queue {
        let mut printer = QueuePrinter::new(name);
        session.print(&mut printer, continue_all)?
    } else {
        bail!("no destination: pass --printer, --queue, or --dry-run");
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "dry_run": dry_run,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            let verb = if dry_run { "would print" } else { "printed" };
            eprintln!(
                "{verb} {} label(s) for {} of {} item(s), {} skipped",
                report.labels_printed, report.items_printed, report.total_items,
                report.items_skipped
            );
        }
    }

    Ok(())
}

fn cmd_printers(format: Format) -> Result<()> {
    let queues = list_print_queues().context("could not list system print queues")?;
    let preferred = preferred_queue(&queues).map(str::to_string);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "queues": queues,
                "preferred": preferred,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if queues.is_empty() {
                eprintln!("no print queues found");
            }
            for q in &queues {
                let marker = if Some(q) == preferred.as_ref() { "*" } else { " " };
                println!("{marker} {q}");
            }
        }
    }

    Ok(())
}

// ── Session assembly ────────────────────────────────────────────────────

/// Load the CSV, settle the column mapping, and pick the template.
fn build_session(
    csv: &str,
    template: Option<&str>,
    mapping_args: &MappingArgs,
) -> Result<LabelSession> {
    let table = input::load_csv(Path::new(csv))?;
    let mapping = build_mapping(&table.headers, mapping_args)?;
    let template = resolve_template(template);
    Ok(LabelSession::new(table, mapping, template))
}

/// Start from the auto-guess and apply explicit flags on top.
fn build_mapping(headers: &[String], args: &MappingArgs) -> Result<FieldMapping> {
    let mut mapping = FieldMapping::guess(headers);

    let mut apply = |flag: &str, value: &Option<String>, slot: &mut Option<String>| -> Result<()> {
        if let Some(header) = value {
            if !headers.iter().any(|h| h == header) {
                bail!(
                    "{flag} {header:?} does not match any CSV header (headers: {})",
                    headers.join(", ")
                );
            }
            *slot = Some(header.clone());
        }
        Ok(())
    };

    apply("--item-col", &args.item_col, &mut mapping.item_name)?;
    apply("--price-col", &args.price_col, &mut mapping.price)?;
    apply("--sku-col", &args.sku_col, &mut mapping.sku_id)?;
    apply("--qty-col", &args.qty_col, &mut mapping.qty)?;

    mapping
        .require_complete()
        .context("column mapping incomplete; pass --item-col/--price-col/--sku-col")?;

    Ok(mapping)
}

/// Explicit template path, or the embedded default.
///
/// An unreadable explicit template falls back to the placeholder-free
/// error label (with a warning) rather than failing the run.
fn resolve_template(path: Option<&str>) -> String {
    match path {
        Some(p) => read_template(Path::new(p)).unwrap_or_else(|e| {
            eprintln!("warning: could not read template {p}: {e}; using fallback");
            FALLBACK_TEMPLATE.to_string()
        }),
        None => DEFAULT_TEMPLATE.to_string(),
    }
}

/// Discards everything; backs `--dry-run`.
struct NullPrinter;

impl Printer for NullPrinter {
    fn send_raw(&mut self, _data: &[u8]) -> Result<(), PrintError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_flags_override_the_guess() {
        let headers = headers(&["Item Name", "Price", "SKU", "Code"]);
        let args = MappingArgs {
            item_col: None,
            price_col: None,
            sku_col: Some("Code".into()),
            qty_col: None,
        };
        let mapping = build_mapping(&headers, &args).unwrap();
        assert_eq!(mapping.sku_id.as_deref(), Some("Code"));
        assert_eq!(mapping.item_name.as_deref(), Some("Item Name"));
    }

    #[test]
    fn unknown_column_flag_is_rejected() {
        let headers = headers(&["Item Name", "Price", "SKU"]);
        let args = MappingArgs {
            item_col: None,
            price_col: None,
            sku_col: Some("Barcode".into()),
            qty_col: None,
        };
        let err = build_mapping(&headers, &args).unwrap_err();
        assert!(err.to_string().contains("--sku-col"));
    }

    #[test]
    fn unmappable_headers_are_reported() {
        let headers = headers(&["a", "b"]);
        let args = MappingArgs {
            item_col: None,
            price_col: None,
            sku_col: None,
            qty_col: None,
        };
        assert!(build_mapping(&headers, &args).is_err());
    }

    #[test]
    fn default_template_carries_the_standard_tokens() {
        for token in ["{{item_name}}", "{{price}}", "{{sku_id}}", "{{by}}", "{{barcode_x}}"] {
            assert!(DEFAULT_TEMPLATE.contains(token), "missing {token}");
        }
    }
}

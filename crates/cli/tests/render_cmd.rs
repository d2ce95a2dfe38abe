//! CLI tests for the `labelpress render` subcommand.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::cargo;

fn labelpress_cmd() -> Command {
    Command::new(cargo::cargo_bin!("labelpress"))
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

const SAMPLE_CSV: &str = "Item Name,Price,SKU\nWidget,9.99,123456\nGadget,4.50,ABC123\n";
const GEOMETRY_TEMPLATE: &str = "^BY{{by}}^FT{{barcode_x}},112^BCN^FD{{sku_id}}^FS";

fn rendered_documents(args: &[&str]) -> Vec<String> {
    let output = labelpress_cmd()
        .args(args)
        .args(["--output", "json"])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["documents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn renders_with_computed_barcode_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "items.csv", SAMPLE_CSV);
    let tpl = write_file(dir.path(), "label.zpl", GEOMETRY_TEMPLATE);

    let docs = rendered_documents(&["render", &csv, "--template", &tpl]);
    assert_eq!(docs.len(), 2);
    // "123456": module width 2, 68 modules, 136 dots, offset 124.
    assert_eq!(docs[0], "^BY2^FT124,112^BCN^FD123456^FS");
    // "ABC123": non-numeric, (35 + 66) * 2 = 202 dots, offset (384-202)/2 = 91.
    assert_eq!(docs[1], "^BY2^FT91,112^BCN^FDABC123^FS");
}

#[test]
fn renders_with_default_embedded_template() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "items.csv", SAMPLE_CSV);

    let docs = rendered_documents(&["render", &csv]);
    assert_eq!(docs.len(), 2);
    assert!(docs[0].contains("^FDWidget^FS"), "got {:?}", docs[0]);
    assert!(docs[0].contains("^FD9.99^FS"));
    assert!(docs[0].starts_with("^XA"));
    assert!(!docs[0].contains("{{"), "unsubstituted token in {:?}", docs[0]);
}

#[test]
fn explicit_column_flags_override_detection() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(
        dir.path(),
        "items.csv",
        "Product,Cost,Barcode\nWidget,9.99,123456\n",
    );
    let tpl = write_file(dir.path(), "label.zpl", "{{item_name}}|{{price}}|{{sku_id}}");

    let docs = rendered_documents(&[
        "render",
        &csv,
        "--template",
        &tpl,
        "--item-col",
        "Product",
        "--price-col",
        "Cost",
        "--sku-col",
        "Barcode",
    ]);
    assert_eq!(docs, vec!["Widget|9.99|123456"]);
}

#[test]
fn data_cannot_inject_zpl_commands() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(
        dir.path(),
        "items.csv",
        "Item Name,Price,SKU\n\"Evil^XZ~JA\nName\",9.99,123\n",
    );
    let tpl = write_file(dir.path(), "label.zpl", "^FD{{item_name}}^FS");

    let docs = rendered_documents(&["render", &csv, "--template", &tpl]);
    assert_eq!(docs, vec!["^FDEvilXZJA Name^FS"]);
}

#[test]
fn unmapped_required_columns_fail_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "items.csv", "a,b,c\n1,2,3\n");

    let output = labelpress_cmd()
        .args(["render", &csv])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("column mapping incomplete"),
        "stderr: {stderr}"
    );
}

#[test]
fn unknown_mapping_flag_names_the_flag() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "items.csv", SAMPLE_CSV);

    let output = labelpress_cmd()
        .args(["render", &csv, "--sku-col", "Nope"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--sku-col"), "stderr: {stderr}");
    assert!(stderr.contains("Nope"), "stderr: {stderr}");
}

#[test]
fn unreadable_template_falls_back_to_error_label() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "items.csv", SAMPLE_CSV);

    let output = labelpress_cmd()
        .args(["render", &csv, "--template", "/no/such/file.zpl"])
        .args(["--output", "json"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning"), "stderr: {stderr}");

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["documents"][0].as_str().unwrap(),
        "^XA^FDError Loading Template^FS^XZ"
    );
}

#[test]
fn out_dir_writes_one_file_per_row() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "items.csv", SAMPLE_CSV);
    let tpl = write_file(dir.path(), "label.zpl", "^FD{{sku_id}}^FS");
    let out = dir.path().join("out");

    let output = labelpress_cmd()
        .args(["render", &csv, "--template", &tpl])
        .args(["--out-dir", &out.to_string_lossy()])
        .output()
        .expect("failed to run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let first = fs::read_to_string(out.join("label_0001.zpl")).unwrap();
    assert_eq!(first, "^FD123456^FS");
    let second = fs::read_to_string(out.join("label_0002.zpl")).unwrap();
    assert_eq!(second, "^FDABC123^FS");
}

#[test]
fn empty_csv_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "empty.csv", "");

    let output = labelpress_cmd()
        .args(["render", &csv])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("empty"), "stderr: {stderr}");
}

#[test]
fn header_only_csv_renders_zero_documents() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_file(dir.path(), "items.csv", "Item Name,Price,SKU\n");

    let docs = rendered_documents(&["render", &csv]);
    assert!(docs.is_empty());
}

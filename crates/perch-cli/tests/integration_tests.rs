//! Integration tests for the `perch` binary.
//!
//! These run the real executable against temporary data directories and
//! check its output, its exit status and the files it leaves behind.

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn perch(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_perch"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run perch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn list_json(data_dir: &Path) -> Value {
    let output = perch(data_dir, &["list", "--json"]);
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("list --json prints JSON")
}

#[test]
fn test_first_run_writes_starter_files() {
    let temp_dir = TempDir::new().unwrap();
    let output = perch(temp_dir.path(), &["list"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Calculator"));
    assert!(temp_dir.path().join("perch-list.json").exists());
    assert!(temp_dir.path().join("perch-menu.json").exists());
}

#[test]
fn test_startup_exit_codes() {
    let temp_dir = TempDir::new().unwrap();

    let missing = perch(&temp_dir.path().join("nope"), &["list"]);
    assert_eq!(missing.status.code(), Some(3));

    std::fs::write(temp_dir.path().join("perch-list.json"), "not json").unwrap();
    assert_eq!(perch(temp_dir.path(), &["list"]).status.code(), Some(4));

    std::fs::write(temp_dir.path().join("perch-list.json"), "[]").unwrap();
    assert_eq!(perch(temp_dir.path(), &["list"]).status.code(), Some(5));
}

#[test]
fn test_add_rename_remove_round_trip() {
    let temp_dir = TempDir::new().unwrap();

    let added = perch(temp_dir.path(), &["add", "Docs", "https://docs.rs"]);
    assert!(added.status.success());
    let id = stdout(&added);

    let list = list_json(temp_dir.path());
    assert_eq!(list[1]["Title"], "Docs");
    assert_eq!(list[1]["ItemID"], id.as_str());

    assert!(perch(temp_dir.path(), &["rename", &id, "Rust docs"]).status.success());
    assert_eq!(list_json(temp_dir.path())[1]["Title"], "Rust docs");

    assert!(perch(temp_dir.path(), &["remove", &id]).status.success());
    assert_eq!(list_json(temp_dir.path()).as_array().unwrap().len(), 1);
}

#[test]
fn test_remove_container_needs_cascade() {
    let temp_dir = TempDir::new().unwrap();
    let popup_id = stdout(&perch(temp_dir.path(), &["add", "Games", "--popup"]));
    let child = perch(temp_dir.path(), &["new", "--after", &popup_id]);
    assert!(child.status.success());

    // The new node sits next to the pop-up, so move it inside.
    let child_id = stdout(&child);
    assert!(perch(temp_dir.path(), &["move", &child_id, "--parent", &popup_id])
        .status
        .success());

    assert!(!perch(temp_dir.path(), &["remove", &popup_id]).status.success());
    assert!(perch(temp_dir.path(), &["remove", &popup_id, "--cascade"])
        .status
        .success());
}

#[test]
fn test_second_untitled_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    assert!(perch(temp_dir.path(), &["new"]).status.success());

    let second = perch(temp_dir.path(), &["new"]);
    assert!(!second.status.success());
    assert!(String::from_utf8_lossy(&second.stderr).contains("untitled"));
}

#[test]
fn test_second_untitled_menu_item_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    assert!(perch(temp_dir.path(), &["add-menu", "item"]).status.success());

    let second = perch(temp_dir.path(), &["add-menu", "item"]);
    assert!(!second.status.success());

    let menu = perch(temp_dir.path(), &["menu", "--json"]);
    let items: Value = serde_json::from_slice(&menu.stdout).unwrap();
    let untitled = items
        .as_array()
        .unwrap()
        .iter()
        .filter(|item| item["Title"] == "untitled")
        .count();
    assert_eq!(untitled, 1);
}

#[test]
fn test_add_with_untitled_title_is_guarded() {
    let temp_dir = TempDir::new().unwrap();
    assert!(perch(temp_dir.path(), &["add", "untitled", "x.exe"]).status.success());
    assert!(!perch(temp_dir.path(), &["add", "Untitled", "y.exe"]).status.success());
    assert!(perch(temp_dir.path(), &["add", "Editor", "y.exe"]).status.success());
}

#[test]
fn test_check_reports_dangling_reference() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("perch-menu.json"),
        r#"[{"Title": "Old", "ItemType": 4, "ItemID": "m1", "PopupID": "gone", "MenuItems": null}]"#,
    )
    .unwrap();

    let output = perch(temp_dir.path(), &["check"]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("dangling pop-up reference: Old"));
}

#[test]
fn test_import_rejects_menu_file_into_list() {
    let temp_dir = TempDir::new().unwrap();
    perch(temp_dir.path(), &["list"]);
    let menu_file = temp_dir.path().join("perch-menu.json");

    let output = perch(temp_dir.path(), &["import", menu_file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert_eq!(list_json(temp_dir.path())[0]["Title"], "Calculator");
}

#[test]
fn test_backup_writes_timestamped_copy() {
    let temp_dir = TempDir::new().unwrap();
    let backups = TempDir::new().unwrap();

    let output = perch(
        temp_dir.path(),
        &["backup", "--menu", backups.path().to_str().unwrap()],
    );
    assert!(output.status.success());
    let written = stdout(&output);
    assert!(written.contains("perch-menu-backup_"));
    assert!(Path::new(&written).exists());
}

#[test]
fn test_icons_names_builtin_asset() {
    let temp_dir = TempDir::new().unwrap();
    assert!(perch(temp_dir.path(), &["add", "Site", "https://example.com"])
        .status
        .success());

    let output = perch(temp_dir.path(), &["icons"]);
    assert!(output.status.success());
    let site = stdout(&output)
        .lines()
        .find(|line| line.starts_with("Site:"))
        .map(str::to_string)
        .unwrap();
    assert!(site.contains("builtin:globe"));
    assert!(site.contains("globe.png"));
}

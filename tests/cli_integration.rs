//! End-to-end tests for the fisk binary.
//!
//! Every test points the config directory at a fresh temp dir so a user's
//! own configuration cannot leak in.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use image::{GrayImage, Luma};
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn isolated_cmd(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("fisk");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("FISK_MODEL")
        .env_remove("FISK_LABELS")
        .env_remove("FISK_THRESHOLDS")
        .env_remove("FISK_METADATA")
        .env_remove("FISK_INPUT_SIZE")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a flat grey PNG.
fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    GrayImage::from_pixel(48, 32, Luma([128u8]))
        .save(&path)
        .expect("write test png");
    path
}

fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is a JSON event"))
        .collect()
}

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    isolated_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quality"))
        .stdout(predicate::str::contains("species"));
}

#[test]
fn test_no_arguments_prints_setup_guide() {
    let home = TempDir::new().unwrap();
    isolated_cmd(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("fisk config init"));
}

#[test]
fn test_species_list() {
    let home = TempDir::new().unwrap();
    isolated_cmd(home.path())
        .args(["species", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Torsk"))
        .stdout(predicate::str::contains("Gadus morhua"))
        .stdout(predicate::str::contains("Abbor"));
}

#[test]
fn test_species_show_json() {
    let home = TempDir::new().unwrap();
    let output = isolated_cmd(home.path())
        .args(["species", "show", "Torsk", "--json"])
        .assert()
        .success();

    let events = json_lines(&output.get_output().stdout);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["spec_version"], "1.0");
    assert_eq!(events[0]["event"], "result");
    assert_eq!(events[0]["payload"]["result_type"], "species_info");
    assert_eq!(events[0]["payload"]["species"]["scientificName"], "Gadus morhua");
}

#[test]
fn test_species_show_unknown_fails() {
    let home = TempDir::new().unwrap();
    isolated_cmd(home.path())
        .args(["species", "show", "Blåkveite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in catalog"));
}

#[test]
fn test_config_init_then_path() {
    let home = TempDir::new().unwrap();
    isolated_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    isolated_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    isolated_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_check_reports_missing_model() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("fisk");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[model]\npath = \"/nonexistent/fish.onnx\"\n",
    )
    .unwrap();

    isolated_cmd(home.path())
        .args(["config", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_missing_input_fails() {
    let home = TempDir::new().unwrap();
    isolated_cmd(home.path())
        .arg(home.path().join("nowhere.jpg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid image files"));
}

#[test]
fn test_quality_flags_flat_image() {
    let home = TempDir::new().unwrap();
    let image = write_png(home.path(), "flat.png");

    isolated_cmd(home.path())
        .arg("quality")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL]"))
        .stdout(predicate::str::contains("brightness"));
}

#[test]
fn test_classify_without_model_is_not_identified() {
    let home = TempDir::new().unwrap();
    let image = write_png(home.path(), "fangst.png");

    isolated_cmd(home.path())
        .arg(&image)
        .arg("--no-quality-gate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kunne ikke identifisere fisk"));
}

#[test]
fn test_classify_flat_image_is_uncertain() {
    let home = TempDir::new().unwrap();
    let image = write_png(home.path(), "fangst.png");

    isolated_cmd(home.path())
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usikker gjenkjenning"));
}

#[test]
fn test_classify_json_events() {
    let home = TempDir::new().unwrap();
    write_png(home.path(), "a.png");
    write_png(home.path(), "b.png");

    let output = isolated_cmd(home.path())
        .arg(home.path())
        .args(["--json", "--no-quality-gate"])
        .assert()
        .success();

    let events = json_lines(&output.get_output().stdout);
    assert_eq!(events.len(), 4);
    assert_eq!(events[0]["event"], "pipeline_started");
    assert_eq!(events[0]["payload"]["total_captures"], 2);
    assert_eq!(events[0]["payload"]["model_available"], false);

    for event in &events[1..3] {
        assert_eq!(event["event"], "capture_completed");
        assert_eq!(event["payload"]["status"], "rejected");
        assert_eq!(
            event["payload"]["outcome"]["decision"]["reason"]["code"],
            "no_model"
        );
    }
    assert!(
        events[1]["payload"]["file"]
            .as_str()
            .unwrap()
            .ends_with("a.png")
    );

    assert_eq!(events[3]["event"], "pipeline_completed");
    assert_eq!(events[3]["payload"]["rejected"], 2);
}

#[test]
fn test_unreadable_image_fails_run() {
    let home = TempDir::new().unwrap();
    let broken = home.path().join("broken.jpg");
    std::fs::write(&broken, b"not an image").unwrap();

    isolated_cmd(home.path())
        .arg(&broken)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Kunne ikke ta bilde"))
        .stderr(predicate::str::contains("1 of 1 captures could not be processed"));
}

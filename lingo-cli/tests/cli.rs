use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn sample_path(dir: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("lingo-parser")
        .join("samples")
        .join(dir)
        .join(format!("{}.txt", name))
}

fn temp_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn level_summary_via_cli() {
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("level").arg(sample_path("levels", "small"));

    cmd.assert().success().stdout(
        predicate::str::contains("size: 4x3")
            .and(predicate::str::contains("effects: Slime, Ivy"))
            .and(predicate::str::contains("props: Crate, Big Pipe"))
            .and(predicate::str::contains("water: level 2, behind")),
    );
}

#[test]
fn parse_single_line_as_json() {
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("parse")
        .arg(sample_path("levels", "small"))
        .arg("--line")
        .arg("4")
        .arg("--format")
        .arg("json");

    cmd.assert().success().stdout(
        predicate::str::contains("lightAngle").and(predicate::str::contains("\"line\": 4")),
    );
}

#[test]
fn parse_prints_canonical_text() {
    let file = temp_file("[#a:1,#b:[:]]\n\npoint( 1 ,2 )\n");
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("parse").arg(file.path());

    cmd.assert()
        .success()
        .stdout("[#a: 1, #b: [:]]\npoint(1, 2)\n");
}

#[test]
fn init_lists_definitions_by_category() {
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("init")
        .arg(sample_path("init", "props"))
        .arg("--kind")
        .arg("props");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Crate").and(predicate::str::contains("Decals")));
}

#[test]
fn init_rejects_unknown_kind() {
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("init")
        .arg(sample_path("init", "props"))
        .arg("--kind")
        .arg("sounds");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown kind 'sounds'"));
}

#[test]
fn check_passes_on_samples() {
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("check")
        .arg(sample_path("levels", "small"))
        .arg(sample_path("levels", "geometry_72x43"))
        .arg(sample_path("init", "tiles"))
        .arg(sample_path("init", "effects"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("checked 4 file(s), no failures"));
}

#[test]
fn check_reports_failing_lines() {
    let file = temp_file("[1, 2]\n[1, 2\n[#a: 1]\n");
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("check").arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(":2: ").and(predicate::str::contains("1 failure(s)")));
}

#[test]
fn config_file_sets_output_format() {
    let config = temp_file("[output]\nformat = \"json\"\n");
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.arg("--config")
        .arg(config.path())
        .arg("level")
        .arg(sample_path("levels", "small"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"cameras\""));
}

fn level_with_unknown_code() -> tempfile::NamedTempFile {
    let source = std::fs::read_to_string(sample_path("levels", "small")).expect("read sample");
    temp_file(&source.replacen("[[0, [1, 2]]", "[[42, [1, 2]]", 1))
}

#[test]
fn level_reports_geometry_fallbacks() {
    let file = level_with_unknown_code();
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.env_remove("RUST_LOG").arg("level").arg(file.path());

    cmd.assert().success().stdout(predicate::str::contains("fallbacks: 1")).stderr(
        predicate::str::contains("unknown type code 42").and(predicate::str::contains("level")),
    );
}

#[test]
fn fallback_reports_can_be_disabled() {
    let file = level_with_unknown_code();
    let config = temp_file("[decode]\nreport_fallbacks = false\n");
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(config.path())
        .arg("level")
        .arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unknown type code").not());
}

#[test]
fn environment_sets_output_format() {
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.env("LINGO_OUTPUT__FORMAT", "yaml")
        .arg("level")
        .arg(sample_path("levels", "small"));

    cmd.assert().success().stdout(
        predicate::str::contains("cameras:").and(predicate::str::contains("default_terrain: true")),
    );
}

#[test]
fn format_flag_wins_over_environment() {
    let mut cmd = cargo_bin_cmd!("lingo");
    cmd.env("LINGO_OUTPUT__FORMAT", "yaml")
        .arg("level")
        .arg(sample_path("levels", "small"))
        .arg("--format")
        .arg("text");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("size: 4x3"));
}

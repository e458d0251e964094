use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("saferouting-cli");
    cmd.env("RUST_LOG", "error");
    cmd
}

fn build_state(state: &Path) {
    cli()
        .arg("build")
        .arg("--graph")
        .arg(fixtures_dir().join("diamond.json"))
        .arg("--state")
        .arg(state)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 nodes and 4 edges"));
}

fn route_args(cmd: &mut Command, state: &Path) {
    cmd.arg("route")
        .arg("--state")
        .arg(state)
        .args(["--x0", "0.0", "--y0", "0.0", "--x1", "0.002", "--y1", "0.0"]);
}

#[test]
fn build_then_route_prints_document() {
    let dir = tempdir().expect("temp dir");
    let state = dir.path().join("routes.bin");
    build_state(&state);

    let mut cmd = cli();
    route_args(&mut cmd, &state);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""nodes":[1,2,4]"#))
        .stdout(predicate::str::contains(r#""cost":2.0"#))
        .stdout(predicate::str::contains(r#""length":3"#));
}

#[test]
fn avoid_flag_changes_route() {
    let dir = tempdir().expect("temp dir");
    let state = dir.path().join("routes.bin");
    build_state(&state);

    let mut cmd = cli();
    route_args(&mut cmd, &state);
    cmd.args(["--avoid", "2", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Route: 3 nodes, cost 5.000"))
        .stdout(predicate::str::contains("- 3 (0.001000, -0.001000)"));
}

#[test]
fn save_flag_persists_cache() {
    let dir = tempdir().expect("temp dir");
    let state = dir.path().join("routes.bin");
    build_state(&state);

    let mut cmd = cli();
    route_args(&mut cmd, &state);
    cmd.arg("--save").assert().success();

    cli()
        .arg("info")
        .arg("--state")
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cached routes: 1"))
        .stdout(predicate::str::contains("Hook: identity"));
}

#[test]
fn build_from_csv_with_bounds() {
    let dir = tempdir().expect("temp dir");
    let state = dir.path().join("routes.bin");
    let csv_dir = fixtures_dir().join("diamond");

    cli()
        .arg("build")
        .arg("--nodes")
        .arg(csv_dir.join("nodes.csv"))
        .arg("--edges")
        .arg(csv_dir.join("edges.csv"))
        .arg("--state")
        .arg(&state)
        .args(["--bounds", "-0.0005,0.0015,0.0021,-0.0015"])
        .assert()
        .success();

    cli()
        .arg("info")
        .arg("--state")
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bounds: -0.0005,0.0015,0.0021,-0.0015"));

    let mut cmd = cli();
    cmd.arg("route")
        .arg("--state")
        .arg(&state)
        .args(["--x0", "0.0", "--y0", "0.0", "--x1", "0.003", "--y1", "0.0"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""error":"query is out of bounds""#));
}

#[test]
fn missing_state_is_reported() {
    let dir = tempdir().expect("temp dir");
    cli()
        .arg("info")
        .arg("--state")
        .arg(dir.path().join("absent.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load state"));
}

#[test]
fn build_requires_graph_input() {
    let dir = tempdir().expect("temp dir");
    cli()
        .arg("build")
        .arg("--state")
        .arg(dir.path().join("routes.bin"))
        .assert()
        .failure();
}

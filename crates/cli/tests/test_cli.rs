//! Grounded on `examples/stac-utils-rustac/crates/cli/tests/test_cli.rs`:
//! `rstest` fixtures driving the compiled binary via `assert_cmd`, plus
//! plain parse-time tests that never spawn a subprocess.

use assert_cmd::Command;
use pdsstac_cli::Cli;
use clap::Parser;
use rstest::{fixture, rstest};

#[fixture]
fn command() -> Command {
    assert_cmd::Command::cargo_bin("pdsstac").expect("compiled binary")
}

#[rstest]
fn no_subcommand_fails(mut command: Command) {
    command.assert().failure();
}

#[rstest]
fn check_update_without_cache_reports_and_succeeds(mut command: Command) {
    let dir = tempfile::tempdir().expect("tempdir");
    command
        .arg("--database")
        .arg(dir.path())
        .arg("check-update")
        .assert()
        .success();
}

#[rstest]
fn unknown_subcommand_fails(mut command: Command) {
    command.arg("not-a-verb").assert().failure();
}

#[test]
fn extract_website_parses() {
    let cli = Cli::parse_from(["pdsstac", "extract", "website"]);
    assert!(matches!(cli.command(), pdsstac_cli::Command::Extract { kind: pdsstac_cli::ExtractKind::Website }));
}

#[test]
fn transform_records_parses() {
    let cli = Cli::parse_from(["pdsstac", "transform", "records", "--sample", "10"]);
    assert!(matches!(cli.command(), pdsstac_cli::Command::Transform { kind: pdsstac_cli::TransformKind::Records }));
}

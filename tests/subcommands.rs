//! Integration tests for the `init` and `completions` subcommands.

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn amalgam() -> Command {
    Command::cargo_bin("amalgam").expect("amalgam binary")
}

#[test]
fn init_writes_default_config_once() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    amalgam()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));

    let cfg = tmp.child("amalgam.toml");
    cfg.assert(predicate::str::contains("[classify]"));
    cfg.assert(predicate::str::contains("\".hpp\""));
    cfg.assert(predicate::str::contains("\".cpp\""));

    amalgam()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    amalgam()
        .current_dir(tmp.path())
        .args(["init", "--force", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn generated_config_round_trips_through_a_bundle_run() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("a.hh").write_str("int a;\n").expect("write");

    amalgam()
        .current_dir(tmp.path())
        .args(["init", "--quiet"])
        .assert()
        .success();

    amalgam()
        .current_dir(tmp.path())
        .args(["--quiet", "--name", "a", "-o", "a.hpp", "a.hh"])
        .assert()
        .success();

    tmp.child("a.hpp")
        .assert(predicate::str::contains("#line 1 \"a.hh\"\nint a;\n"));
}

#[test]
fn completions_to_stdout_mention_the_binary() {
    amalgam()
        .args(["completions", "bash", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("amalgam"));
}

#[test]
fn completions_need_a_destination() {
    amalgam()
        .args(["completions", "fish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--out-dir"));
}

#[test]
fn completions_written_to_out_dir() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    amalgam()
        .args(["completions", "zsh", "--out-dir"])
        .arg(tmp.path().join("comp"))
        .assert()
        .success()
        .stdout(predicate::str::contains("_amalgam"));

    tmp.child("comp/_amalgam").assert(predicate::path::exists());
}

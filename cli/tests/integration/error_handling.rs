//! Error handling integration tests for fcp CLI.
//!
//! These tests verify:
//! - Configuration errors exit with code 2 before anything is written
//! - A missing source item exits with code 1 and writes nothing
//! - A failing destination fails the item

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, local_uri};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_missing_destination_root() {
    let fx = TestFixture::new(1);
    fx.create_item("item.txt", "x");
    let missing = fx.dsts[0].path().join("does-not-exist");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(local_uri(&missing))
        .arg("item.txt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Root directory does not exist"));
}

#[test]
fn test_destination_root_is_a_file() {
    let fx = TestFixture::new(1);
    fx.create_item("item.txt", "x");
    let file = fx.dsts[0].path().join("file");
    fs::write(&file, "not a dir").unwrap();

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(local_uri(&file))
        .arg("item.txt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Root is not a directory"));
}

#[test]
fn test_unknown_scheme() {
    let fx = TestFixture::new(1);
    fx.create_item("item.txt", "x");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg("s3://bucket/prefix")
        .arg("item.txt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No backend registered for scheme: s3"));
}

#[test]
fn test_invalid_mode_flag() {
    let fx = TestFixture::new(1);
    fx.create_item("item.txt", "x");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(&fx.dst_uris()[0])
        .arg("--file-mode")
        .arg("rwx")
        .arg("item.txt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("file_mode"));

    assert_eq!(fs::read_dir(fx.dsts[0].path()).unwrap().count(), 0);
}

#[test]
fn test_missing_source_item_writes_nothing() {
    let fx = TestFixture::new(2);

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--from").arg(fx.src_uri());
    for uri in fx.dst_uris() {
        cmd.arg("--to").arg(uri);
    }
    cmd.arg("missing.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source_read"));

    for dst in &fx.dsts {
        assert_eq!(fs::read_dir(dst.path()).unwrap().count(), 0);
    }
}

#[cfg(unix)]
#[test]
fn test_failing_destination_fails_item() {
    // A directory where the item should land makes the final rename fail.
    let fx = TestFixture::new(2);
    fx.create_item("item.txt", "content");
    fs::create_dir(fx.dsts[1].path().join("item.txt")).unwrap();

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--from").arg(fx.src_uri());
    for uri in fx.dst_uris() {
        cmd.arg("--to").arg(uri);
    }
    cmd.arg("item.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to persist temporary file"));

    assert!(fx.dsts[1].path().join("item.txt").is_dir());
}

#[test]
fn test_missing_required_arguments() {
    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("item.txt").assert().code(2);
}

//! Basic functionality integration tests for fcp CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{TestFixture, assert_file_content, local_uri};
use predicates::prelude::*;
use rstest::rstest;
use std::fs;

#[test]
fn test_replicate_single_item() {
    let fx = TestFixture::new(3);
    fx.create_item("greeting.txt", "hello");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--from").arg(fx.src_uri());
    for uri in fx.dst_uris() {
        cmd.arg("--to").arg(uri);
    }
    cmd.arg("greeting.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("Replicated 1 item to 3 destinations"));

    fx.assert_replicated("greeting.txt", "hello");
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn test_replicate_to_n_destinations(#[case] destinations: usize) {
    let fx = TestFixture::new(destinations);
    fx.create_item("data.bin", "payload");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("-q").arg("--from").arg(fx.src_uri());
    for uri in fx.dst_uris() {
        cmd.arg("--to").arg(uri);
    }
    cmd.arg("data.bin").assert().success();

    fx.assert_replicated("data.bin", "payload");
}

#[test]
fn test_replicate_multiple_items_with_nested_paths() {
    let fx = TestFixture::new(2);
    fx.create_item("a.txt", "first");
    fx.create_item("deep/er/b.txt", "second");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("-q")
        .arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(&fx.dst_uris()[0])
        .arg("--to")
        .arg(&fx.dst_uris()[1])
        .arg("a.txt")
        .arg("deep/er/b.txt")
        .assert()
        .success();

    fx.assert_replicated("a.txt", "first");
    fx.assert_replicated("deep/er/b.txt", "second");
}

#[test]
fn test_plain_paths_are_accepted() {
    let fx = TestFixture::new(1);
    fx.create_item("plain.txt", "no scheme");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("-q")
        .arg("--from")
        .arg(fx.src.path())
        .arg("--to")
        .arg(fx.dsts[0].path())
        .arg("plain.txt")
        .assert()
        .success();

    assert_file_content(&fx.dsts[0].path().join("plain.txt"), "no scheme");
}

#[test]
fn test_overwrites_existing_destination_file() {
    let fx = TestFixture::new(1);
    fx.create_item("item.txt", "new");
    fs::write(fx.dsts[0].path().join("item.txt"), "old").unwrap();

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("-q")
        .arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(&fx.dst_uris()[0])
        .arg("item.txt")
        .assert()
        .success();

    assert_file_content(&fx.dsts[0].path().join("item.txt"), "new");
}

#[cfg(unix)]
#[test]
fn test_file_and_dir_mode_flags() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new(1);
    fx.create_item("secret/key.pem", "k");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("-q")
        .arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(&fx.dst_uris()[0])
        .arg("--file-mode")
        .arg("0600")
        .arg("--dir-mode")
        .arg("0700")
        .arg("--no-sync")
        .arg("secret/key.pem")
        .assert()
        .success();

    let dst = fx.dsts[0].path();
    let file_mode = fs::metadata(dst.join("secret/key.pem"))
        .unwrap()
        .permissions()
        .mode();
    let dir_mode = fs::metadata(dst.join("secret")).unwrap().permissions().mode();
    assert_eq!(file_mode & 0o777, 0o600);
    assert_eq!(dir_mode & 0o777, 0o700);
}

#[cfg(unix)]
#[rstest]
#[case::hash("mirror#2", "mirror")]
#[case::percent("a%41", "aA")]
#[case::question("what?now", "what")]
fn test_reserved_characters_in_destination_name(
    #[case] name: &str,
    #[case] decoy: &str,
    #[values(false, true)] as_uri: bool,
) {
    let fx = TestFixture::new(1);
    fx.create_item("item.txt", "exact");
    // A truncated or over-decoded root would land in the decoy instead.
    let decoy = fx.named_dst(decoy);
    let target = fx.named_dst(name);

    let to = if as_uri {
        local_uri(&target)
    } else {
        target.display().to_string()
    };
    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("-q")
        .arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(to)
        .arg("item.txt")
        .assert()
        .success();

    assert_file_content(&target.join("item.txt"), "exact");
    assert!(!decoy.join("item.txt").exists());
}

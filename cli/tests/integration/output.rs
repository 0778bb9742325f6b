//! JSON output integration tests for fcp CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use serde_json::Value;

fn parse_stdout(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout should be one JSON document")
}

#[test]
fn test_json_success() {
    let fx = TestFixture::new(2);
    fx.create_item("one.txt", "1");
    fx.create_item("two.txt", "2");

    let mut cmd = cargo_bin_cmd!("fcp");
    cmd.arg("--output").arg("json").arg("--from").arg(fx.src_uri());
    for uri in fx.dst_uris() {
        cmd.arg("--to").arg(uri);
    }
    let assert = cmd.arg("one.txt").arg("two.txt").assert().success();

    let json = parse_stdout(&assert.get_output().stdout);
    assert_eq!(json["schema_version"], "1.0");
    assert_eq!(json["ok"], true);
    assert_eq!(json["destinations"].as_array().unwrap().len(), 2);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i["outcome"] == "copied"));
    assert!(items.iter().all(|i| i.get("error_code").is_none()));
}

#[test]
fn test_json_failure_stops_at_first_failed_item() {
    let fx = TestFixture::new(1);
    fx.create_item("present.txt", "here");

    let mut cmd = cargo_bin_cmd!("fcp");
    let assert = cmd
        .arg("--output")
        .arg("json")
        .arg("--from")
        .arg(fx.src_uri())
        .arg("--to")
        .arg(&fx.dst_uris()[0])
        .arg("present.txt")
        .arg("absent.txt")
        .arg("never-reached.txt")
        .assert()
        .code(1);

    let json = parse_stdout(&assert.get_output().stdout);
    assert_eq!(json["ok"], false);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["outcome"], "copied");
    assert_eq!(items[1]["uri"], "absent.txt");
    assert_eq!(items[1]["outcome"], "failed");
    assert_eq!(items[1]["error_code"], "source_read");
}

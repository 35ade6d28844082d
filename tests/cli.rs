// End-to-end runs of the command line binary.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use tempfile::TempDir;

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("locales")).unwrap();
    fs::write(
        dir.path().join("locales/en.json"),
        r#"{ "foo": { "bar": "bar" } }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("locales/ja.json"),
        r#"{ "foo": { "bar": "ja_bar" } }"#,
    )
    .unwrap();
    fs::write(dir.path().join("index.html"), "<p data-t=\"foo.bar\"></p>").unwrap();
    dir
}

#[test]
fn localizes_a_directory_into_the_output_dir() {
    let dir = site();
    let out = dir.path().join("i18n");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg(dir.path())
        .args(["-l", "en", "-i", "en,ja", "-o"])
        .arg(&out);
    cmd.assert().success();

    let en = fs::read_to_string(out.join("index.html")).unwrap();
    assert_eq!(en, "<p>bar</p>");
    let ja = fs::read_to_string(out.join("ja/index.html")).unwrap();
    assert_eq!(ja, "<p>ja_bar</p>");
}

#[test]
fn reports_missing_bundles_and_fails() {
    let dir = site();
    let out = dir.path().join("i18n");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg(dir.path())
        .args(["-l", "en", "-i", "en,xx", "-o"])
        .arg(&out);
    cmd.assert().failure();
}

#[test]
fn running_without_arguments_prints_usage() {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.assert().failure();
}

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn verpin_cmd() -> Command {
    Command::cargo_bin("verpin").unwrap()
}

#[test]
fn test_update_with_empty_cache_and_no_deps_is_a_noop() {
    let tmp = TempDir::new().unwrap();

    verpin_cmd()
        .args(["update-versions"])
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("none cached"));
}

#[test]
fn test_update_creates_the_cache_directory() {
    let tmp = TempDir::new().unwrap();

    verpin_cmd()
        .args(["update-versions", "--pyver", "3.11.2"])
        .env("HOME", tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join(".verpin/cache/3.11.2").is_dir());
}

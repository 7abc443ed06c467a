use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn verpin_cmd() -> Command {
    Command::cargo_bin("verpin").unwrap()
}

const SOLVABLE: &str = r#"
[dependencies.a]
versions = ["1.0", "2.0", "3.0"]
iniver = "2.0"

[dependencies.b]
versions = ["1.0", "2.0"]
iniver = "1.0"

[[tests]]
true_when = [{ a = ["2.0", "3.0"], b = ["1.0", "1.0"] }]
"#;

fn write_case(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("case.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_virtual_backtrack_prints_best_mapping() {
    let tmp = TempDir::new().unwrap();
    let case = write_case(&tmp, SOLVABLE);

    verpin_cmd()
        .args(["virtual", case.to_str().unwrap(), "--iterations", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a==3.0, b==1.0"));
}

#[test]
fn test_virtual_minimize_prefers_the_lowest_feasible_cost() {
    let tmp = TempDir::new().unwrap();
    let case = write_case(&tmp, SOLVABLE);

    verpin_cmd()
        .args([
            "virtual",
            case.to_str().unwrap(),
            "--iterations",
            "10",
            "--minimize",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("a==2.0, b==1.0"));
}

#[test]
fn test_virtual_annealing_with_feasible_start_succeeds() {
    let tmp = TempDir::new().unwrap();
    let case = write_case(&tmp, SOLVABLE);

    verpin_cmd()
        .args([
            "virtual",
            case.to_str().unwrap(),
            "--algorithm",
            "annealing",
            "--iterations",
            "50",
            "--seed",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("b==1.0"));
}

#[test]
fn test_virtual_unknown_algorithm_fails() {
    let tmp = TempDir::new().unwrap();
    let case = write_case(&tmp, SOLVABLE);

    verpin_cmd()
        .args(["virtual", case.to_str().unwrap(), "--algorithm", "gradient"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown algorithm"));
}

#[test]
fn test_virtual_missing_testcase_fails() {
    verpin_cmd()
        .args(["virtual", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_virtual_no_solution_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let case = write_case(
        &tmp,
        r#"
[dependencies.a]
versions = ["1.0", "2.0"]
iniver = "1.0"

[[tests]]
true_when = [{ a = ["9.0", "9.0"] }]
"#,
    );

    verpin_cmd()
        .args(["virtual", case.to_str().unwrap(), "--iterations", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No feasible version mapping"));
}

#[test]
fn test_virtual_invalid_testcase_fails_with_diagnostic() {
    let tmp = TempDir::new().unwrap();
    let case = write_case(
        &tmp,
        r#"
[dependencies.a]
versions = ["1.0"]
iniver = "9.9"
"#,
    );

    verpin_cmd()
        .args(["virtual", case.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not among its known versions"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_fixtures_pass() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("logic")).unwrap();
    fs::write(
        temp_dir.path().join("logic/implication.end"),
        r#"Axiom A => B ~ Axiom under =>: A => B
Goal A => B ~ New goal: A => B
Intro ~ Assuming A, new goal: B
By A => B ~ New goal: A
Done ~ Goal closed by A; Goal completed: A => B
Done ~ error # No active goal
"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("numbers.end"),
        "Start 1\nUse [n] => S([n]) ~ Applied rule, new term: 2\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("test").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("implication.end (6 checked)"))
        .stdout(predicate::str::contains("numbers.end (1 checked)"))
        .stdout(predicate::str::contains("2 file(s), 7 check(s), 0 failed"));
}

#[test]
fn test_cli_fixture_mismatch_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("wrong.end"),
        "Goal B ~ New goal: B\nDone ~ Goal completed: B\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("test").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("1 of 2 failed"))
        .stdout(predicate::str::contains("error # Goal not completed: B"));
}

#[test]
fn test_cli_fixtures_ignore_other_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "Done ~ nonsense\n").unwrap();

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("test").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 file(s), 0 check(s), 0 failed"));
}

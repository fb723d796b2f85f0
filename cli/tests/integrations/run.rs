use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn script(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_run_complete_proof() {
    let temp_dir = TempDir::new().unwrap();
    let file = script(
        &temp_dir,
        "proof.end",
        r#"
# modus ponens
Axiom A => B
Goal A => B
Intro
By A => B
Done
"#,
    );

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("run").arg(&file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Axiom under =>: A => B"))
        .stdout(predicate::str::contains("Assuming A, new goal: B"))
        .stdout(predicate::str::contains("Goal completed: A => B"))
        .stdout(predicate::str::contains("modus ponens").not());
}

#[test]
fn test_cli_run_stops_at_first_failure() {
    let temp_dir = TempDir::new().unwrap();
    let file = script(&temp_dir, "broken.end", "Goal B\nDone\nStatus\n");

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("run").arg(&file);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Goal not completed: B"))
        .stdout(predicate::str::contains("Open goal").not());
}

#[test]
fn test_cli_run_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let file = script(&temp_dir, "numbers.end", "Reduce 2 | S([n]) => [n]\n");

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("run").arg(&file).arg("--json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let record: serde_json::Value =
        serde_json::from_str(String::from_utf8(output).unwrap().trim()).unwrap();
    assert_eq!(record["line"], 1);
    assert_eq!(record["success"], true);
    assert_eq!(record["message"], "1");
    assert_eq!(record["results"][0]["type"], "Term");
}

#[test]
fn test_cli_run_resolves_imports_next_to_the_script() {
    let temp_dir = TempDir::new().unwrap();
    script(&temp_dir, "facts.end", "Axiom A\nAxiom A => B\n");
    let file = script(&temp_dir, "main.end", "Using facts\nGoal B\nDone A | A => B\n");

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("run").arg(&file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Imported: facts"))
        .stdout(predicate::str::contains("Goal completed: B"));
}

#[test]
fn test_cli_run_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let file = script(&temp_dir, "typo.end", "Axiom A\nGoal f(a\n");

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("run").arg(&file);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("typo.end:2"));
}

#[test]
fn test_cli_max_steps() {
    let temp_dir = TempDir::new().unwrap();
    let file = script(&temp_dir, "loop.end", "Reduce a | a => b\n");

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("--max-steps").arg("1").arg("run").arg(&file);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("did not terminate after 1 steps"));
}

#[test]
fn test_cli_run_missing_file() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("endive").unwrap();
    cmd.arg("run").arg(temp_dir.path().join("nowhere.end"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

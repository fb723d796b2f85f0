//! Fixture files: proof scripts whose lines may carry an expectation
//!
//! `statement ~ expected` asserts that the statement succeeds with the
//! rendered message `expected`; `statement ~ error # expected` asserts that
//! it fails with that message. Other lines run unchecked.

use anyhow::{Context, Result};
use endive::importer::SCRIPT_EXTENSION;
use endive::{Engine, ResourceLimits};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const SEPARATOR: &str = " ~ ";
const ERROR_MARKER: &str = "error #";

#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub line_number: usize,
    pub statement: String,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
}

/// Split a fixture line into its statement and expectation
pub fn split_expectation(line: &str) -> (&str, Option<Expectation>) {
    let Some((statement, expected)) = line.rsplit_once(SEPARATOR) else {
        return (line, None);
    };
    let expected = expected.trim();
    let expectation = match expected.strip_prefix(ERROR_MARKER) {
        Some(message) => Expectation::Failure(message.trim().to_string()),
        None => Expectation::Success(expected.to_string()),
    };
    (statement.trim_end(), Some(expectation))
}

/// Every `.end` file below `dir`, in a stable order
pub fn collect_fixtures(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.path().extension().and_then(|s| s.to_str()) == Some(SCRIPT_EXTENSION) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Run one fixture file in a fresh engine
pub fn run_fixture(path: &Path, limits: &ResourceLimits) -> Result<FileReport> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut engine = Engine::with_limits(limits.clone());
    if let Some(parent) = path.parent() {
        engine.set_base_path(parent);
    }

    let mut report = FileReport {
        path: path.to_path_buf(),
        checked: 0,
        mismatches: Vec::new(),
    };

    for (index, line) in source.lines().enumerate() {
        let (statement, expectation) = split_expectation(line);
        let (success, actual) = match engine.process_line(statement) {
            Ok(outcome) => (outcome.success, outcome.message()),
            Err(e) => (false, e.to_string()),
        };

        let Some(expectation) = expectation else {
            continue;
        };
        report.checked += 1;

        let (expected_success, expected) = match &expectation {
            Expectation::Success(message) => (true, message),
            Expectation::Failure(message) => (false, message),
        };
        if success != expected_success || &actual != expected {
            debug!(line = index + 1, statement, "fixture mismatch");
            let shown = if success {
                actual
            } else {
                format!("error # {}", actual)
            };
            report.mismatches.push(Mismatch {
                line_number: index + 1,
                statement: statement.to_string(),
                expected: line
                    .rsplit_once(SEPARATOR)
                    .map(|(_, e)| e.trim().to_string())
                    .unwrap_or_default(),
                actual: shown,
            });
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_success_expectation() {
        assert_eq!(
            split_expectation("Goal A => B ~ New goal: A => B"),
            ("Goal A => B", Some(Expectation::Success("New goal: A => B".to_string())))
        );
    }

    #[test]
    fn test_split_error_expectation() {
        assert_eq!(
            split_expectation("Done ~ error # No active goal"),
            ("Done", Some(Expectation::Failure("No active goal".to_string())))
        );
    }

    #[test]
    fn test_plain_lines_have_no_expectation() {
        assert_eq!(split_expectation("Axiom A"), ("Axiom A", None));
        // `~` inside a symbol is not a separator
        assert_eq!(split_expectation("Axiom a ~> b"), ("Axiom a ~> b", None));
    }
}

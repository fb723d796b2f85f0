use crossterm::style::Stylize;
use endive::Outcome;
use serde_json::{json, Value};

use crate::fixtures::{FileReport, Mismatch};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// Echo of a script line before its outcome
    pub fn format_line(&self, line: &str) -> String {
        format!("{} {}\n", ">".dark_grey(), line)
    }

    pub fn format_outcome(&self, outcome: &Outcome) -> String {
        let message = outcome.message();
        if outcome.success {
            if message.is_empty() {
                return String::new();
            }
            format!("  {} {}\n", "✓".green(), message)
        } else {
            format!("  {} {}\n", "✗".red(), message)
        }
    }

    /// One JSON record per processed line
    pub fn format_json(&self, line_number: usize, line: &str, outcome: &Outcome) -> Value {
        json!({
            "line": line_number,
            "input": line,
            "success": outcome.success,
            "message": outcome.message(),
            "results": outcome.results,
        })
    }

    pub fn format_file_report(&self, report: &FileReport) -> String {
        let mut output = String::new();
        let name = report.path.display();

        if report.mismatches.is_empty() {
            output.push_str(&format!(
                "{} {} ({} checked)\n",
                "✓".green(),
                name,
                report.checked
            ));
            return output;
        }

        output.push_str(&format!(
            "{} {} ({} of {} failed)\n",
            "✗".red(),
            name,
            report.mismatches.len(),
            report.checked
        ));
        for mismatch in &report.mismatches {
            output.push_str(&self.format_mismatch(mismatch));
        }
        output
    }

    fn format_mismatch(&self, mismatch: &Mismatch) -> String {
        format!(
            "  line {}: {}\n    expected: {}\n    got:      {}\n",
            mismatch.line_number,
            mismatch.statement,
            mismatch.expected,
            mismatch.actual.as_str().yellow()
        )
    }

    pub fn format_summary(&self, files: usize, checked: usize, failed: usize) -> String {
        let verdict = if failed == 0 {
            "ok".green()
        } else {
            "FAILED".red()
        };
        format!(
            "\n{}: {} file(s), {} check(s), {} failed\n",
            verdict, files, checked, failed
        )
    }
}

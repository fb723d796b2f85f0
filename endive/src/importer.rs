//! `Using a.b.c`: run the proof script `a/b/c.end`
//!
//! Paths resolve against the directory of the file being imported, or the
//! engine's base path at top level. A file is run at most once; each
//! successful import leaves a breakpoint `import:<name>` behind.

use crate::engine::Engine;
use crate::error::EndiveError;
use crate::helpers::expect_arity;
use crate::object::Object;
use crate::parser::parse_line_from;
use crate::pipeline::Pipeline;
use crate::{EndiveResult, Outcome};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of proof-script files
pub const SCRIPT_EXTENSION: &str = "end";

pub(crate) struct Imports {
    pub(crate) base_path: PathBuf,
    /// Imported files, with the name their breakpoint was recorded under
    imported: HashMap<PathBuf, String>,
    importing: Vec<PathBuf>,
}

impl Default for Imports {
    fn default() -> Self {
        Self {
            base_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            imported: HashMap::new(),
            importing: Vec::new(),
        }
    }
}

impl Imports {
    /// Forget imports whose breakpoint an undo or rollback discarded
    pub(crate) fn retain_after_rollback(&mut self, pipeline: &Pipeline) {
        self.imported
            .retain(|_, breakpoint| pipeline.has_breakpoint(breakpoint));
    }

    fn resolve(&self, name: &str) -> PathBuf {
        let base = self
            .importing
            .last()
            .and_then(|current| current.parent())
            .unwrap_or(self.base_path.as_path());
        let relative: PathBuf = name.split('.').collect();
        let path = base.join(relative).with_extension(SCRIPT_EXTENSION);
        fs::canonicalize(&path).unwrap_or(path)
    }
}

fn import_breakpoint(name: &str) -> String {
    format!("import:{}", name)
}

fn import_message(name: &str, template: &str) -> Object {
    Object::term("Import", vec![Object::atom(name)]).with_result(template)
}

impl Engine {
    pub(crate) fn import(&mut self, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(crate::engine::USING, arguments, 1..=1)?;
        let Some(name) = arguments[0].name().filter(|_| arguments[0].is_atom()) else {
            return Ok(Outcome::failure(vec![
                arguments[0].with_result("Cannot import [], expected a module name")
            ]));
        };
        let path = self.imports.resolve(name);

        if self.imports.imported.contains_key(&path) {
            return Ok(Outcome::success(vec![import_message(name, "Already imported: [0]")]));
        }
        if self.imports.importing.contains(&path) {
            return Ok(Outcome::failure(vec![import_message(name, "Circular import: [0]")]));
        }
        if self.imports.importing.len() >= self.limits().max_import_depth {
            return Ok(Outcome::error(format!(
                "Import depth limit of {} reached",
                self.limits().max_import_depth
            )));
        }
        if !path.exists() {
            return Ok(Outcome::error(format!("File not found: {}", path.display())));
        }

        let source = fs::read_to_string(&path)
            .map_err(|e| EndiveError::Import(format!("{}: {}", path.display(), e)))?;

        debug!(module = name, path = %path.display(), "importing");
        self.imports.importing.push(path.clone());
        let outcome = self.run_script(&source, &path);
        self.imports.importing.pop();

        let outcome = outcome?;
        if !outcome.success {
            return Ok(outcome);
        }
        let breakpoint = import_breakpoint(name);
        self.breakpoint(&breakpoint);
        self.imports.imported.insert(path, breakpoint);
        Ok(Outcome::success(vec![import_message(name, "Imported: [0]")]))
    }

    /// Run every line of `source`, stopping at the first failure
    fn run_script(&mut self, source: &str, path: &Path) -> EndiveResult<Outcome> {
        let source_id = path.display().to_string();
        for (index, line) in source.lines().enumerate() {
            let parsed = parse_line_from(line, &source_id).map_err(|e| e.at_line(index + 1))?;
            let Some((directive, arguments)) = parsed else {
                continue;
            };
            let outcome = self.process(&directive, arguments)?;
            if !outcome.success {
                return Ok(outcome);
            }
        }
        Ok(Outcome::success(Vec::new()))
    }
}

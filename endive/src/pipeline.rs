//! Directive routing through the registered helpers
//!
//! Per directive: every applicable forhook runs in registration order,
//! threading the arguments; the first helper owning a handler for the
//! directive handles it; the backhooks of the forhooks that ran are applied
//! to the results in reverse order.

use crate::helpers::{Helper, HookFlow};
use crate::object::Object;
use crate::{EndiveError, EndiveResult, Outcome};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// A directive whose handler pushed a state snapshot
#[derive(Debug, Clone)]
struct Handled {
    directive: String,
    helper: usize,
}

#[derive(Default)]
pub struct Pipeline {
    helpers: Vec<Box<dyn Helper>>,
    handled: Vec<Handled>,
    breakpoints: HashMap<String, usize>,
    max_term_depth: Option<usize>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject directives whose arguments nest deeper than `depth`, checked on
    /// entry and after every forhook
    pub fn with_max_term_depth(mut self, depth: usize) -> Self {
        self.max_term_depth = Some(depth);
        self
    }

    fn check_depth(&self, arguments: &[Object]) -> EndiveResult<()> {
        let Some(max) = self.max_term_depth else {
            return Ok(());
        };
        match arguments.iter().map(Object::depth).max() {
            Some(depth) if depth > max => {
                warn!(depth, max, "arguments nested too deeply");
                Err(EndiveError::term_too_deep(max, depth))
            }
            _ => Ok(()),
        }
    }

    /// Append a helper. Registration order is forhook order.
    pub fn register(&mut self, helper: Box<dyn Helper>) {
        self.helpers.push(helper);
    }

    pub fn helper_names(&self) -> Vec<&'static str> {
        self.helpers.iter().map(|helper| helper.name()).collect()
    }

    /// Number of directives that can be undone
    pub fn undo_depth(&self) -> usize {
        self.handled.len()
    }

    pub fn process(&mut self, directive: &str, arguments: Vec<Object>) -> EndiveResult<Outcome> {
        self.check_depth(&arguments)?;
        let mut arguments = arguments;
        let mut backhooks = Vec::new();

        for index in 0..self.helpers.len() {
            let helper = &mut self.helpers[index];
            if !helper.has_forhook(directive) {
                continue;
            }
            trace!(helper = helper.name(), directive, "forhook");
            if helper.has_backhook(directive) {
                backhooks.push(index);
            }
            match helper.forhook(directive, arguments)? {
                HookFlow::Continue(rewritten) => {
                    self.check_depth(&rewritten)?;
                    arguments = rewritten;
                }
                HookFlow::Reject(diagnostic) => {
                    debug!(helper = self.helpers[index].name(), directive, "directive rejected by forhook");
                    let results = self.run_backhooks(directive, &backhooks, vec![diagnostic]);
                    return Ok(Outcome::failure(results));
                }
            }
        }

        let Some(index) = self.helpers.iter().position(|helper| helper.handles(directive)) else {
            warn!(directive, "no handler registered");
            let error = Outcome::error(format!("No handler registered for directive: {}", directive));
            let results = self.run_backhooks(directive, &backhooks, error.results);
            return Ok(Outcome::failure(results));
        };

        let helper = &mut self.helpers[index];
        let depth = helper.depth();
        let outcome = helper.handle(directive, &arguments)?;
        if helper.depth() > depth {
            self.handled.push(Handled {
                directive: directive.to_string(),
                helper: index,
            });
        }
        debug!(
            helper = self.helpers[index].name(),
            directive,
            success = outcome.success,
            "directive processed"
        );

        let results = self.run_backhooks(directive, &backhooks, outcome.results);
        Ok(Outcome {
            success: outcome.success,
            results,
        })
    }

    fn run_backhooks(&mut self, directive: &str, backhooks: &[usize], results: Vec<Object>) -> Vec<Object> {
        backhooks.iter().rev().fold(results, |results, &index| {
            trace!(helper = self.helpers[index].name(), directive, "backhook");
            self.helpers[index].backhook(directive, results)
        })
    }

    /// Revert the most recent state-changing directive.
    ///
    /// Returns the directive undone, or `None` when there is nothing to undo.
    /// Breakpoints set after the undone directive are dropped.
    pub fn undo(&mut self) -> Option<String> {
        let handled = self.handled.pop()?;
        let depth = self.handled.len();
        self.breakpoints.retain(|_, recorded| *recorded <= depth);
        let helper = &mut self.helpers[handled.helper];
        if !helper.undo() {
            return None;
        }
        debug!(helper = helper.name(), directive = %handled.directive, "undo");
        Some(handled.directive)
    }

    /// Record a named checkpoint in the pipeline and in every helper
    pub fn breakpoint(&mut self, name: &str) {
        self.breakpoints.insert(name.to_string(), self.handled.len());
        for helper in &mut self.helpers {
            helper.breakpoint(name);
        }
        debug!(name, depth = self.handled.len(), "breakpoint");
    }

    pub fn has_breakpoint(&self, name: &str) -> bool {
        self.breakpoints.contains_key(name)
    }

    /// Return every helper to the checkpoint `name`.
    ///
    /// Nothing changes unless the pipeline and every helper know the name.
    pub fn rollback(&mut self, name: &str) -> bool {
        let Some(&depth) = self.breakpoints.get(name) else {
            return false;
        };
        if !self.helpers.iter().all(|helper| helper.has_breakpoint(name)) {
            return false;
        }
        for helper in &mut self.helpers {
            helper.rollback(name);
        }
        self.handled.truncate(depth);
        self.breakpoints.retain(|_, recorded| *recorded <= depth);
        debug!(name, depth, "rollback");
        true
    }
}

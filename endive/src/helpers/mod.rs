//! Stateful helpers plugged into the pipeline
//!
//! A helper owns a [`History`] of state snapshots and a [`Registry`] telling
//! the pipeline which directives it pre-processes (forhooks), post-processes
//! (backhooks) and handles. Helpers implement [`StatefulHelper`]; the
//! object-safe [`Helper`] trait the pipeline drives is derived from it.

pub mod alias;
pub mod build;
pub mod functorial;
pub mod goal;
pub mod history;
pub mod peano;

pub use alias::AliasHelper;
pub use build::BuildHelper;
pub use functorial::FunctorialHelper;
pub use goal::GoalHelper;
pub use history::{History, StateView};
pub use peano::PeanoHelper;

use crate::error::EndiveError;
use crate::object::Object;
use crate::state::Step;
use crate::{EndiveResult, Outcome};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::rc::Rc;

/// Registry key matching every directive without a more specific entry
pub const ALL: &str = "ALL";

/// What a forhook decided about a directive
#[derive(Debug, Clone, PartialEq)]
pub enum HookFlow {
    /// Carry on with these (possibly rewritten) arguments
    Continue(Vec<Object>),
    /// Skip the handler and report this diagnostic
    Reject(Object),
}

pub type Forhook<H> = fn(&mut H, &str, Vec<Object>) -> EndiveResult<HookFlow>;
pub type Backhook<H> = fn(&mut H, &str, Vec<Object>) -> Vec<Object>;
pub type Handler<H> = fn(&mut H, &str, &[Object]) -> EndiveResult<Outcome>;

/// A forhook and the backhook that undoes its presentation changes
pub struct Hook<H> {
    pub forhook: Forhook<H>,
    pub backhook: Option<Backhook<H>>,
}

impl<H> Clone for Hook<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Hook<H> {}

/// Directive tables of one helper, built once at construction
pub struct Registry<H> {
    hooks: HashMap<&'static str, Hook<H>>,
    handlers: HashMap<&'static str, Handler<H>>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            hooks: HashMap::new(),
            handlers: HashMap::new(),
        }
    }
}

impl<H> Registry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hook(
        mut self,
        directives: &[&'static str],
        forhook: Forhook<H>,
        backhook: Option<Backhook<H>>,
    ) -> Self {
        for directive in directives {
            self.hooks.insert(*directive, Hook { forhook, backhook });
        }
        self
    }

    pub fn handler(mut self, directive: &'static str, handler: Handler<H>) -> Self {
        self.handlers.insert(directive, handler);
        self
    }

    /// The hook registered for `directive`, falling back to [`ALL`]
    pub fn hook_for(&self, directive: &str) -> Option<Hook<H>> {
        self.hooks
            .get(directive)
            .or_else(|| self.hooks.get(ALL))
            .copied()
    }

    pub fn handler_for(&self, directive: &str) -> Option<Handler<H>> {
        self.handlers.get(directive).copied()
    }
}

/// A helper as the pipeline sees it
pub trait Helper {
    fn name(&self) -> &'static str;

    fn has_forhook(&self, directive: &str) -> bool;
    fn forhook(&mut self, directive: &str, arguments: Vec<Object>) -> EndiveResult<HookFlow>;
    fn has_backhook(&self, directive: &str) -> bool;
    fn backhook(&mut self, directive: &str, results: Vec<Object>) -> Vec<Object>;

    fn handles(&self, directive: &str) -> bool;
    fn handle(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome>;

    /// Depth of the snapshot stack
    fn depth(&self) -> usize;
    fn undo(&mut self) -> bool;
    fn breakpoint(&mut self, name: &str);
    fn has_breakpoint(&self, name: &str) -> bool;
    fn rollback(&mut self, name: &str) -> bool;
}

/// The part of a helper that differs from one helper to the next
pub trait StatefulHelper: Sized {
    type State;

    const NAME: &'static str;

    fn registry(&self) -> &Registry<Self>;
    fn history(&self) -> &History<Self::State>;
    fn history_mut(&mut self) -> &mut History<Self::State>;

    fn state(&self) -> Rc<Self::State> {
        self.history().current()
    }

    /// Push the new state of a successful transition; a rejected one leaves
    /// the history untouched.
    fn commit(&mut self, step: Step<Self::State>) -> Outcome {
        match step {
            Step::Next(state, results) => {
                self.history_mut().set(state);
                Outcome::success(results)
            }
            Step::Rejected(results) => Outcome::failure(results),
        }
    }
}

impl<T: StatefulHelper> Helper for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn has_forhook(&self, directive: &str) -> bool {
        self.registry().hook_for(directive).is_some()
    }

    fn forhook(&mut self, directive: &str, arguments: Vec<Object>) -> EndiveResult<HookFlow> {
        match self.registry().hook_for(directive) {
            Some(hook) => (hook.forhook)(self, directive, arguments),
            None => Ok(HookFlow::Continue(arguments)),
        }
    }

    fn has_backhook(&self, directive: &str) -> bool {
        self.registry()
            .hook_for(directive)
            .is_some_and(|hook| hook.backhook.is_some())
    }

    fn backhook(&mut self, directive: &str, results: Vec<Object>) -> Vec<Object> {
        match self.registry().hook_for(directive).and_then(|hook| hook.backhook) {
            Some(backhook) => backhook(self, directive, results),
            None => results,
        }
    }

    fn handles(&self, directive: &str) -> bool {
        self.registry().handler_for(directive).is_some()
    }

    fn handle(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        match self.registry().handler_for(directive) {
            Some(handler) => handler(self, directive, arguments),
            None => Err(EndiveError::Engine(format!(
                "{} has no handler for {}",
                T::NAME,
                directive
            ))),
        }
    }

    fn depth(&self) -> usize {
        self.history().depth()
    }

    fn undo(&mut self) -> bool {
        self.history_mut().undo()
    }

    fn breakpoint(&mut self, name: &str) {
        self.history_mut().breakpoint(name)
    }

    fn has_breakpoint(&self, name: &str) -> bool {
        self.history().has_breakpoint(name)
    }

    fn rollback(&mut self, name: &str) -> bool {
        self.history_mut().rollback(name)
    }
}

/// Check the argument count a handler or hook received
pub fn expect_arity(
    directive: &str,
    arguments: &[Object],
    expected: RangeInclusive<usize>,
) -> EndiveResult<()> {
    if expected.contains(&arguments.len()) {
        return Ok(());
    }
    let described = if expected.start() == expected.end() {
        expected.start().to_string()
    } else {
        format!("{} to {}", expected.start(), expected.end())
    };
    Err(EndiveError::arity(directive, described, arguments.len()))
}


//! Goal-directed proof directives: `Goal`, `Intro`, `By`, `Done`, `Axiom`,
//! `Status`

use super::{expect_arity, History, Registry, StateView, StatefulHelper};
use crate::context::DEFAULT_SYMBOL;
use crate::object::Object;
use crate::resource_limits::ResourceLimits;
use crate::state::goal::{self, GoalState};
use crate::{EndiveResult, Outcome};

/// Marker accepted as the second argument of `By`
pub const FORCE_MARKER: &str = "force";

pub struct GoalHelper {
    registry: Registry<Self>,
    history: History<GoalState>,
    max_steps: usize,
}

impl GoalHelper {
    pub fn new(limits: &ResourceLimits) -> Self {
        let registry = Registry::<Self>::new()
            .handler("Goal", Self::handle_goal)
            .handler("Intro", Self::handle_intro)
            .handler("By", Self::handle_by)
            .handler("Done", Self::handle_done)
            .handler("Axiom", Self::handle_axiom)
            .handler("Status", Self::handle_status);
        Self {
            registry,
            history: History::default(),
            max_steps: limits.max_reduction_steps,
        }
    }

    /// Read-only access to the proof state for other helpers
    pub fn view(&self) -> StateView<GoalState> {
        self.history.view()
    }

    fn handle_goal(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 1..=1)?;
        let step = goal::start(&self.state(), &arguments[0], self.max_steps)?;
        Ok(self.commit(step))
    }

    fn handle_intro(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 0..=0)?;
        let step = goal::intro(&self.state(), self.max_steps)?;
        Ok(self.commit(step))
    }

    fn handle_by(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 1..=2)?;
        let force = match arguments.get(1) {
            None => false,
            Some(marker) if marker.is_atom() && marker.name() == Some(FORCE_MARKER) => true,
            Some(other) => {
                return Ok(Outcome::failure(vec![
                    other.with_result(format!("Expected {} as second argument, got []", FORCE_MARKER))
                ]))
            }
        };
        let step = goal::by(&self.state(), &arguments[0], force, self.max_steps)?;
        Ok(self.commit(step))
    }

    fn handle_done(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 0..=1)?;
        let step = goal::done(&self.state(), arguments.first(), self.max_steps)?;
        Ok(self.commit(step))
    }

    /// `Axiom term` or `Axiom symbol, term`
    fn handle_axiom(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 1..=2)?;
        let (symbol, term) = match arguments {
            [term] => (DEFAULT_SYMBOL, term),
            [symbol, term] => match symbol.name().filter(|_| symbol.is_atom()) {
                Some(name) => (name, term),
                None => {
                    return Ok(Outcome::failure(vec![
                        symbol.with_result("Axiom symbol [] must be a plain symbol")
                    ]))
                }
            },
            _ => return Err(crate::EndiveError::arity(directive, "1 to 2", arguments.len())),
        };
        let step = goal::axiom(&self.state(), symbol, term);
        Ok(self.commit(step))
    }

    fn handle_status(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 0..=0)?;
        Ok(Outcome::success(goal::status(&self.state())))
    }
}

impl StatefulHelper for GoalHelper {
    type State = GoalState;

    const NAME: &'static str = "goal";

    fn registry(&self) -> &Registry<Self> {
        &self.registry
    }

    fn history(&self) -> &History<GoalState> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History<GoalState> {
        &mut self.history
    }
}


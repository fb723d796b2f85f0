//! Forward chaining (`Start`, `Use`, `Clear`) and the stateless checks
//! `Check` and `Reduce`

use super::{expect_arity, History, Registry, StateView, StatefulHelper};
use crate::buildability::{check, Verdict};
use crate::context::DEFAULT_SYMBOL;
use crate::object::Object;
use crate::operations::reduce;
use crate::resource_limits::ResourceLimits;
use crate::state::build::{self, BuildState};
use crate::state::GoalState;
use crate::{EndiveResult, Outcome};

pub struct BuildHelper {
    registry: Registry<Self>,
    history: History<BuildState>,
    goal_state: StateView<GoalState>,
    max_steps: usize,
}

impl BuildHelper {
    /// `goal_state` supplies the context `Check` runs against
    pub fn new(limits: &ResourceLimits, goal_state: StateView<GoalState>) -> Self {
        let registry = Registry::<Self>::new()
            .handler("Start", Self::handle_start)
            .handler("Use", Self::handle_use)
            .handler("Clear", Self::handle_clear)
            .handler("Check", Self::handle_check)
            .handler("Reduce", Self::handle_reduce);
        Self {
            registry,
            history: History::default(),
            goal_state,
            max_steps: limits.max_reduction_steps,
        }
    }

    pub fn view(&self) -> StateView<BuildState> {
        self.history.view()
    }

    fn handle_start(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 1..=1)?;
        let step = build::start(&arguments[0], self.max_steps)?;
        Ok(self.commit(step))
    }

    fn handle_use(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 1..=1)?;
        let step = build::use_rule(&self.state(), &arguments[0], self.max_steps)?;
        Ok(self.commit(step))
    }

    fn handle_clear(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 0..=0)?;
        Ok(self.commit(build::clear()))
    }

    fn handle_check(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 1..=1)?;
        let term = &arguments[0];
        let context = self.goal_state.current().active_context();
        match check(term, Some(DEFAULT_SYMBOL), &context, self.max_steps)? {
            Verdict::Buildable => Ok(Outcome::success(vec![
                term.with_result("[] is buildable")
            ])),
            unbuildable => Ok(Outcome::failure(unbuildable.diagnostic().into_iter().collect())),
        }
    }

    fn handle_reduce(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 1..=1)?;
        let reduced = reduce(&arguments[0], self.max_steps)?;
        Ok(Outcome::success(vec![reduced]))
    }
}

impl StatefulHelper for BuildHelper {
    type State = BuildState;

    const NAME: &'static str = "build";

    fn registry(&self) -> &Registry<Self> {
        &self.registry
    }

    fn history(&self) -> &History<BuildState> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History<BuildState> {
        &mut self.history
    }
}

//! `Functorial inner, ctor, position, outer, rule` registration and the
//! `Use rule, p1, p2, ...` forhook lifting a rule to a subterm of the
//! working term

use super::peano::numeral_value;
use super::{expect_arity, History, HookFlow, Registry, StateView, StatefulHelper};
use crate::object::Object;
use crate::resource_limits::ResourceLimits;
use crate::state::functorial::{wrap_rule, FunctorialKey, FunctorialState, Lifting};
use crate::state::{BuildState, Step};
use crate::{EndiveResult, Outcome};
use tracing::trace;

pub struct FunctorialHelper {
    registry: Registry<Self>,
    history: History<FunctorialState>,
    build_state: StateView<BuildState>,
    max_steps: usize,
}

/// Name of a plain atom argument, or a diagnostic naming the argument
fn plain_name<'a>(arg: &'a Object, role: &str) -> Result<&'a str, Object> {
    arg.name()
        .filter(|_| arg.is_atom())
        .ok_or_else(|| arg.with_result(format!("{} must be a plain symbol, got []", role)))
}

impl FunctorialHelper {
    /// `build_state` supplies the working term positions are read from
    pub fn new(limits: &ResourceLimits, build_state: StateView<BuildState>) -> Self {
        let registry = Registry::<Self>::new()
            .hook(&["Use"], Self::use_forhook, None)
            .handler("Functorial", Self::handle_functorial);
        Self {
            registry,
            history: History::default(),
            build_state,
            max_steps: limits.max_reduction_steps,
        }
    }

    fn handle_functorial(&mut self, directive: &str, arguments: &[Object]) -> EndiveResult<Outcome> {
        expect_arity(directive, arguments, 5..=5)?;
        let [inner, constructor, position, outer, rule] = arguments else {
            return Err(crate::EndiveError::arity(directive, "5", arguments.len()));
        };

        let names = (
            plain_name(inner, "Inner symbol"),
            plain_name(constructor, "Constructor"),
            plain_name(outer, "Outer symbol"),
        );
        let (inner, constructor, outer) = match names {
            (Ok(inner), Ok(constructor), Ok(outer)) => (inner, constructor, outer),
            (inner, constructor, outer) => {
                let diagnostics = [inner.err(), constructor.err(), outer.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                return Ok(Outcome::failure(diagnostics));
            }
        };
        let Some(position) = numeral_value(position) else {
            return Ok(Outcome::failure(vec![
                position.with_result("Position must be a number, got []")
            ]));
        };
        if !rule.is_rew() {
            return Ok(Outcome::failure(vec![
                rule.with_result("Functorial rule [] must be a rewriting")
            ]));
        }

        let key = FunctorialKey {
            inner_symbol: inner.to_string(),
            constructor: constructor.to_string(),
            position,
        };
        let next = self.state().registered(
            key,
            Lifting {
                outer_symbol: outer.to_string(),
                rule: rule.clone(),
            },
        );
        let result = rule.with_result(format!(
            "Functorial registered for {} at position {}",
            constructor, position
        ));
        Ok(self.commit(Step::next(next, result)))
    }

    /// Replace `rule, p1, ..., pn` by the single lifted rule
    fn use_forhook(&mut self, directive: &str, arguments: Vec<Object>) -> EndiveResult<HookFlow> {
        let Some((rule, positions)) = arguments.split_first() else {
            return Err(crate::EndiveError::arity(directive, "at least 1", 0));
        };
        if positions.is_empty() {
            return Ok(HookFlow::Continue(arguments));
        }

        let mut path = Vec::with_capacity(positions.len());
        for position in positions {
            match numeral_value(position) {
                Some(index) => path.push(index),
                None => {
                    return Ok(HookFlow::Reject(
                        position.with_result("Position must be a number, got []"),
                    ))
                }
            }
        }

        let build = self.build_state.current();
        let wrapped = wrap_rule(
            &self.state(),
            build.working_term.as_ref(),
            rule,
            &path,
            self.max_steps,
        )?;
        match wrapped {
            Ok(lifted) => {
                trace!(?path, rule = %rule, lifted = %lifted, "lifted rule");
                Ok(HookFlow::Continue(vec![lifted]))
            }
            Err(failure) => Ok(HookFlow::Reject(rule.with_result(failure.to_string()))),
        }
    }
}

impl StatefulHelper for FunctorialHelper {
    type State = FunctorialState;

    const NAME: &'static str = "functorial";

    fn registry(&self) -> &Registry<Self> {
        &self.registry
    }

    fn history(&self) -> &History<FunctorialState> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History<FunctorialState> {
        &mut self.history
    }
}

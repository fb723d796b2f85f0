//! Forward chaining: start from a term and rewrite it rule by rule

use super::Step;
use crate::object::Object;
use crate::operations::{compose, reduce};
use crate::EndiveResult;

/// The term under construction, kept both reduced (for display and
/// position lookups) and unreduced (for composition).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildState {
    pub working_term: Option<Object>,
    pub working_term_unreduced: Option<Object>,
}

impl BuildState {
    fn holding(unreduced: Object, reduced: Object) -> Self {
        Self {
            working_term: Some(reduced),
            working_term_unreduced: Some(unreduced),
        }
    }
}

/// `Start term`
pub fn start(term: &Object, max_steps: usize) -> EndiveResult<Step<BuildState>> {
    let reduced = reduce(term, max_steps)?;
    let result = reduced.with_result("Started building from: []");
    Ok(Step::next(BuildState::holding(term.clone(), reduced), result))
}

/// `Use rule`: apply `rule` to the working term and reduce.
pub fn use_rule(state: &BuildState, rule: &Object, max_steps: usize) -> EndiveResult<Step<BuildState>> {
    let (Some(working), Some(unreduced)) = (&state.working_term, &state.working_term_unreduced)
    else {
        return Ok(Step::rejected(
            rule.with_result("No working term, use Start first"),
        ));
    };
    if !rule.is_rew() {
        return Ok(Step::rejected(rule.with_result("[] is not a rewriting rule")));
    }

    // The working term is in normal form, so only the new top-level
    // composition can make progress.
    let Some(applied) = compose(working, rule) else {
        return Ok(Step::rejected(
            Object::term("Mismatch", vec![rule.clone(), working.clone()])
                .with_result("Cannot apply [0] to [1]"),
        ));
    };
    let reduced = reduce(&applied, max_steps)?;

    let next = BuildState::holding(Object::comp(unreduced.clone(), rule.clone()), reduced.clone());
    Ok(Step::next(next, reduced.with_result("Applied rule, new term: []")))
}

/// `Clear`
pub fn clear() -> Step<BuildState> {
    Step::next(
        BuildState::default(),
        Object::atom("Cleared").with_result("Working term cleared"),
    )
}

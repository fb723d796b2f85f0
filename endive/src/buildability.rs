//! Inductive buildability
//!
//! A term is buildable when it can be derived from what is in scope:
//! 1. a term recorded in the context under the current symbol is buildable;
//! 2. a composition is buildable when both operands are, under the same
//!    symbol and context;
//! 3. a rewriting `l ~s~ r` is buildable when `r`, once reduced, is
//!    buildable under `s` with `l` assumed.

use crate::context::Context;
use crate::object::{Object, ObjectKind};
use crate::operations::reduce;
use crate::EndiveResult;

/// Outcome of a buildability check
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Buildable,
    /// The first subterm, left to right, that could not be built
    Unbuildable(Object),
}

impl Verdict {
    pub fn is_buildable(&self) -> bool {
        matches!(self, Verdict::Buildable)
    }

    /// Diagnostic object naming the offending subterm
    pub fn diagnostic(&self) -> Option<Object> {
        match self {
            Verdict::Buildable => None,
            Verdict::Unbuildable(culprit) => Some(culprit.with_result("[] is not buildable")),
        }
    }
}

/// Decide whether `term` is buildable under `symbol` in `context`.
///
/// The caller's context is never modified; hypotheses are added to
/// extended copies. Only the reduction of conclusions can fail.
pub fn check(
    term: &Object,
    symbol: Option<&str>,
    context: &Context,
    max_steps: usize,
) -> EndiveResult<Verdict> {
    if let Some(symbol) = symbol {
        if context.contains(symbol, term) {
            return Ok(Verdict::Buildable);
        }
    }

    match term.kind() {
        ObjectKind::Rew {
            left,
            symbol: rew_symbol,
            right,
        } => {
            let conclusion = reduce(right, max_steps)?;
            check(
                &conclusion,
                Some(rew_symbol),
                &context.with(rew_symbol, left.clone()),
                max_steps,
            )
        }
        ObjectKind::Comp { left, right } => match check(left, symbol, context, max_steps)? {
            Verdict::Buildable => check(right, symbol, context, max_steps),
            unbuildable => Ok(unbuildable),
        },
        _ => Ok(Verdict::Unbuildable(term.clone())),
    }
}

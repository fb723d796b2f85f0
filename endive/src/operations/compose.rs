//! Composition and reduction
//!
//! `compose` is the single operator behind both "rule ∘ rule → rule" and
//! "term ∘ rule → term": it first tries to chain two rewritings, and failing
//! that treats the left operand as the reflexive rewriting of itself and
//! keeps only the right-hand side of the chained result.

use super::{apply, unify};
use crate::error::EndiveError;
use crate::object::{identify, Object, ObjectKind};
use crate::EndiveResult;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Default bound on parallel reduction steps
pub const DEFAULT_MAX_STEPS: usize = 100;

// Control characters never survive the parser, so prefixed names cannot
// collide with user hole names.
const LEFT_PREFIX: &str = "\u{1}L\u{1}";
const RIGHT_PREFIX: &str = "\u{1}R\u{1}";

/// Chain two rewritings under the same symbol.
///
/// The holes of both operands are renamed apart, `a.right` is unified with
/// `b.left`, and the result `a.left ~symbol~ b.right` is instantiated and
/// given its original hole names back.
pub fn compose_rews(a: &Object, b: &Object) -> Option<Object> {
    let (
        ObjectKind::Rew {
            left: a_left,
            symbol,
            right: a_right,
        },
        ObjectKind::Rew {
            left: b_left,
            symbol: b_symbol,
            right: b_right,
        },
    ) = (a.kind(), b.kind())
    else {
        return None;
    };
    if symbol != b_symbol {
        return None;
    }

    let a_renaming = prefixed(&a.hole_names(), LEFT_PREFIX);
    let b_renaming = prefixed(&b.hole_names(), RIGHT_PREFIX);

    let assignment = unify(
        &a_right.rename_holes(&a_renaming),
        &b_left.rename_holes(&b_renaming),
    )?;
    let composed = Object::rew(
        apply(&a_left.rename_holes(&a_renaming), &assignment),
        symbol.clone(),
        apply(&b_right.rename_holes(&b_renaming), &assignment),
    );
    Some(composed.rename_holes(&restored(&composed.hole_names())))
}

fn prefixed(names: &BTreeSet<String>, prefix: &str) -> BTreeMap<String, String> {
    names
        .iter()
        .map(|name| (name.clone(), format!("{}{}", prefix, name)))
        .collect()
}

/// Strip the renaming prefixes. Names coming from the right operand that
/// would clash with a surviving left name get primes appended.
fn restored(names: &BTreeSet<String>) -> BTreeMap<String, String> {
    let mut renaming = BTreeMap::new();
    let mut taken: BTreeSet<String> = names
        .iter()
        .filter(|name| !name.starts_with(LEFT_PREFIX) && !name.starts_with(RIGHT_PREFIX))
        .cloned()
        .collect();

    for name in names {
        if let Some(original) = name.strip_prefix(LEFT_PREFIX) {
            taken.insert(original.to_string());
            renaming.insert(name.clone(), original.to_string());
        }
    }
    for name in names {
        if let Some(original) = name.strip_prefix(RIGHT_PREFIX) {
            let mut candidate = original.to_string();
            while taken.contains(&candidate) {
                candidate.push('\'');
            }
            taken.insert(candidate.clone());
            renaming.insert(name.clone(), candidate);
        }
    }
    renaming
}

/// Compose two operands: rule ∘ rule gives a rule, term ∘ rule gives a term.
pub fn compose(a: &Object, b: &Object) -> Option<Object> {
    if let Some(composed) = compose_rews(a, b) {
        return Some(composed);
    }
    let symbol = b.symbol()?;
    compose_rews(&identify(a, symbol), b).and_then(|rew| rew.right().cloned())
}

/// One parallel step: children first, then the node itself when it is a
/// composition whose operands compose. A composition that does not compose
/// is kept as is.
pub fn reduce_once(term: &Object) -> Object {
    let rebuilt = term.map_children(reduce_once);
    if let ObjectKind::Comp { left, right } = rebuilt.kind() {
        if let Some(composed) = compose(left, right) {
            return composed;
        }
    }
    rebuilt
}

/// Apply [`reduce_once`] until the term stops changing.
///
/// Fails with [`EndiveError::NonTermination`] when no fixpoint is reached
/// within `max_steps` steps.
pub fn reduce(term: &Object, max_steps: usize) -> EndiveResult<Object> {
    let mut current = term.clone();
    for step in 0..max_steps {
        let reduced = reduce_once(&current);
        if reduced == current {
            trace!(steps = step, "reduced to normal form");
            return Ok(current);
        }
        current = reduced;
    }
    Err(EndiveError::NonTermination {
        steps: max_steps,
        term: current.to_string(),
    })
}

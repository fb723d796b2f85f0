//! One-directional matching and bidirectional unification
//!
//! Neither performs an occurs-check: the two operands of a single call are
//! expected to use disjoint hole names. Composition renames its operands
//! apart before unifying.

use crate::object::{Object, ObjectKind};
use std::collections::BTreeMap;

/// Hole name to bound object
pub type Assignment = BTreeMap<String, Object>;

/// Match `concrete` against `pattern`, where only `pattern` may bind holes.
///
/// A hole that occurs more than once must be bound to equal objects at
/// every occurrence; the first binding wins.
pub fn match_left(concrete: &Object, pattern: &Object) -> Option<Assignment> {
    let mut assignment = Assignment::new();
    match_left_into(concrete, pattern, &mut assignment).then_some(assignment)
}

fn match_left_into(concrete: &Object, pattern: &Object, assignment: &mut Assignment) -> bool {
    if let ObjectKind::Hole { name } = pattern.kind() {
        return bind(assignment, name, concrete);
    }
    same_head(concrete, pattern)
        && concrete
            .children()
            .into_iter()
            .zip(pattern.children())
            .all(|(c, p)| match_left_into(c, p, assignment))
}

/// Unify `a` and `b`; holes on either side may bind.
///
/// Bindings thread through sibling children left to right.
pub fn unify(a: &Object, b: &Object) -> Option<Assignment> {
    unify_with(a, b, Assignment::new())
}

/// Unify `a` and `b` extending an existing assignment
pub fn unify_with(a: &Object, b: &Object, mut assignment: Assignment) -> Option<Assignment> {
    unify_into(a, b, &mut assignment).then_some(assignment)
}

fn unify_into(a: &Object, b: &Object, assignment: &mut Assignment) -> bool {
    if let ObjectKind::Hole { name } = b.kind() {
        return bind(assignment, name, a);
    }
    if let ObjectKind::Hole { name } = a.kind() {
        return bind(assignment, name, b);
    }
    same_head(a, b)
        && a
            .children()
            .into_iter()
            .zip(b.children())
            .all(|(x, y)| unify_into(x, y, assignment))
}

fn bind(assignment: &mut Assignment, name: &str, value: &Object) -> bool {
    match assignment.get(name) {
        Some(existing) => existing == value,
        None => {
            assignment.insert(name.to_string(), value.clone());
            true
        }
    }
}

/// Same variant, same name or symbol, same arity
fn same_head(a: &Object, b: &Object) -> bool {
    match (a.kind(), b.kind()) {
        (
            ObjectKind::Term {
                name: n1,
                children: c1,
            },
            ObjectKind::Term {
                name: n2,
                children: c2,
            },
        ) => n1 == n2 && c1.len() == c2.len(),
        (ObjectKind::Rew { symbol: s1, .. }, ObjectKind::Rew { symbol: s2, .. }) => s1 == s2,
        (ObjectKind::Comp { .. }, ObjectKind::Comp { .. }) => true,
        (ObjectKind::Hole { name: n1 }, ObjectKind::Hole { name: n2 }) => n1 == n2,
        (ObjectKind::Goal(g1), ObjectKind::Goal(g2)) => g1 == g2,
        _ => false,
    }
}

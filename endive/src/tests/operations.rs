use crate::error::EndiveError;
use crate::object::Object;
use crate::operations::{apply, compose, compose_rews, match_left, reduce, reduce_once, unify, Assignment};

fn atom(name: &str) -> Object {
    Object::atom(name)
}

fn hole(name: &str) -> Object {
    Object::hole(name)
}

fn f(arg: Object) -> Object {
    Object::term("f", vec![arg])
}

fn rew(left: Object, right: Object) -> Object {
    Object::rew(left, "=>", right)
}

#[test]
fn test_match_left_binds_pattern_holes() {
    let concrete = Object::term("g", vec![atom("a"), f(atom("b"))]);
    let pattern = Object::term("g", vec![hole("x"), f(hole("y"))]);

    let assignment = match_left(&concrete, &pattern).unwrap();
    assert_eq!(assignment.get("x"), Some(&atom("a")));
    assert_eq!(assignment.get("y"), Some(&atom("b")));
}

#[test]
fn test_match_left_repeated_hole_must_agree() {
    let pattern = Object::term("g", vec![hole("x"), hole("x")]);

    assert!(match_left(&Object::term("g", vec![atom("a"), atom("a")]), &pattern).is_some());
    assert!(match_left(&Object::term("g", vec![atom("a"), atom("b")]), &pattern).is_none());
}

#[test]
fn test_match_left_is_one_directional() {
    // A hole on the concrete side only matches the same hole
    assert!(match_left(&hole("y"), &f(hole("x"))).is_none());
    assert!(match_left(&hole("y"), &hole("y")).is_some());
}

#[test]
fn test_match_left_respects_heads() {
    assert!(match_left(&f(atom("a")), &Object::term("g", vec![hole("x")])).is_none());
    assert!(match_left(&f(atom("a")), &Object::term("f", vec![hole("x"), hole("y")])).is_none());
    assert!(match_left(
        &Object::rew(atom("a"), "=>", atom("b")),
        &Object::rew(hole("x"), "->", hole("y"))
    )
    .is_none());
}

#[test]
fn test_unify_binds_both_sides() {
    let a = Object::term("g", vec![hole("x"), atom("b")]);
    let b = Object::term("g", vec![atom("a"), hole("y")]);

    let assignment = unify(&a, &b).unwrap();
    assert_eq!(assignment.get("x"), Some(&atom("a")));
    assert_eq!(assignment.get("y"), Some(&atom("b")));
}

#[test]
fn test_unify_threads_bindings_left_to_right() {
    let a = Object::term("g", vec![hole("x"), hole("x")]);
    let b = Object::term("g", vec![atom("a"), atom("b")]);
    assert!(unify(&a, &b).is_none());
}

#[test]
fn test_apply_substitutes_transitively() {
    let term = Object::term("g", vec![hole("x"), hole("y"), hole("z")]);
    let assignment = Assignment::from([
        ("x".to_string(), f(hole("y"))),
        ("y".to_string(), atom("c")),
    ]);

    let applied = apply(&term, &assignment);
    assert_eq!(
        applied,
        Object::term("g", vec![f(atom("c")), atom("c"), hole("z")])
    );
    assert_eq!(apply(&applied, &assignment), applied);
}

#[test]
fn test_apply_keeps_cyclic_assignments_finite() {
    let assignment = Assignment::from([("x".to_string(), f(hole("x")))]);
    assert_eq!(apply(&hole("x"), &assignment), f(hole("x")));
}

#[test]
fn test_apply_keeps_aux_data() {
    let term = f(hole("x")).with_result("Got []");
    let assignment = Assignment::from([("x".to_string(), atom("a"))]);

    let applied = apply(&term, &assignment);
    assert_eq!(applied.result(), Some("Got []"));
}

#[test]
fn test_compose_rews_identity() {
    let wrap = rew(hole("x"), f(hole("x")));
    let unwrap = rew(f(hole("y")), hole("y"));

    assert_eq!(compose_rews(&wrap, &unwrap), Some(rew(hole("x"), hole("x"))));
}

#[test]
fn test_compose_rews_renames_apart() {
    // Both operands use `x`; the right one's `x` must not be confused with the left one's
    let a = rew(hole("x"), Object::term("g", vec![hole("x"), atom("b")]));
    let b = rew(Object::term("g", vec![atom("a"), hole("x")]), hole("x"));

    assert_eq!(compose_rews(&a, &b), Some(rew(atom("a"), atom("b"))));
}

#[test]
fn test_compose_rews_keeps_independent_holes_distinct() {
    let a = rew(hole("x"), f(hole("x")));
    let b = rew(hole("x"), Object::term("g", vec![hole("x"), hole("z")]));

    let composed = compose_rews(&a, &b).unwrap();
    assert_eq!(
        composed,
        rew(hole("x"), Object::term("g", vec![f(hole("x")), hole("z")]))
    );
}

#[test]
fn test_compose_rews_requires_same_symbol() {
    let a = Object::rew(atom("a"), "=>", atom("b"));
    let b = Object::rew(atom("b"), "->", atom("c"));
    assert_eq!(compose_rews(&a, &b), None);
    assert_eq!(compose_rews(&atom("a"), &b), None);
}

#[test]
fn test_compose_applies_rule_to_term() {
    let rule = rew(f(hole("y")), hole("y"));
    assert_eq!(compose(&f(atom("a")), &rule), Some(atom("a")));
    assert_eq!(compose(&atom("a"), &rule), None);
}

#[test]
fn test_compose_chains_rules() {
    let ab = rew(atom("a"), atom("b"));
    let bc = rew(atom("b"), atom("c"));
    assert_eq!(compose(&ab, &bc), Some(rew(atom("a"), atom("c"))));
}

#[test]
fn test_compose_treats_rule_as_term_when_chaining_fails() {
    let rule = rew(atom("a"), atom("b"));
    let lift = rew(rew(hole("x"), hole("y")), rew(f(hole("x")), f(hole("y"))));

    assert_eq!(compose(&rule, &lift), Some(rew(f(atom("a")), f(atom("b")))));
}

#[test]
fn test_reduce_once_reduces_children_first() {
    let inner = Object::comp(atom("a"), rew(atom("a"), atom("b")));
    let outer = Object::comp(inner, rew(atom("b"), atom("c")));

    assert_eq!(reduce_once(&outer), atom("c"));
}

#[test]
fn test_reduce_keeps_stuck_compositions() {
    let stuck = Object::comp(atom("b"), rew(atom("a"), atom("c")));
    assert_eq!(reduce(&stuck, 100).unwrap(), stuck);
}

#[test]
fn test_reduce_inside_terms() {
    let term = Object::term("g", vec![Object::comp(atom("a"), rew(atom("a"), atom("b")))]);
    assert_eq!(reduce(&term, 100).unwrap(), Object::term("g", vec![atom("b")]));
}

#[test]
fn test_reduce_is_idempotent() {
    let term = Object::comp(
        Object::comp(atom("a"), rew(atom("a"), atom("b"))),
        rew(hole("x"), f(hole("x"))),
    );
    let once = reduce(&term, 100).unwrap();
    assert_eq!(once, f(atom("b")));
    assert_eq!(reduce(&once, 100).unwrap(), once);
}

#[test]
fn test_reduce_step_bound() {
    let term = Object::comp(atom("a"), rew(atom("a"), atom("b")));

    assert_eq!(reduce(&term, 2).unwrap(), atom("b"));
    match reduce(&term, 1) {
        Err(EndiveError::NonTermination { steps, term }) => {
            assert_eq!(steps, 1);
            assert_eq!(term, "b");
        }
        other => panic!("Expected NonTermination, got {:?}", other),
    }
}

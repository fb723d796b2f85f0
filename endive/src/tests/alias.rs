use crate::object::Object;
use crate::state::alias::{collapse, AliasState, ALIAS_HASH_KEY, ALIAS_KEY};

fn definition() -> Object {
    Object::rew(Object::atom("A"), "=>", Object::atom("B"))
}

#[test]
fn test_expand_replaces_alias_atoms() {
    let state = AliasState::default().defined("T", definition());
    let expanded = state.expand(&Object::term("f", vec![Object::atom("T"), Object::atom("U")]));

    assert_eq!(
        expanded,
        Object::term("f", vec![definition(), Object::atom("U")])
    );
    let tagged = expanded.child(0).unwrap();
    assert_eq!(tagged.get(ALIAS_KEY).and_then(|v| v.as_str()), Some("T"));
    assert!(tagged.get(ALIAS_HASH_KEY).is_some());
}

#[test]
fn test_expand_leaves_applications_alone() {
    // Only plain atoms name aliases
    let state = AliasState::default().defined("T", definition());
    let call = Object::term("T", vec![Object::atom("x")]);
    assert_eq!(state.expand(&call), call);
}

#[test]
fn test_collapse_round_trip() {
    let state = AliasState::default().defined("T", definition());
    let expanded = state.expand(&Object::atom("T"));
    assert_eq!(collapse(&expanded), Object::atom("T"));
}

#[test]
fn test_collapse_keeps_other_aux_data() {
    let state = AliasState::default().defined("T", definition());
    let expanded = state.expand(&Object::atom("T")).with_result("New goal: []");

    let collapsed = collapse(&expanded);
    assert_eq!(collapsed, Object::atom("T"));
    assert_eq!(collapsed.result(), Some("New goal: []"));
    assert!(collapsed.get(ALIAS_KEY).is_none());
}

#[test]
fn test_changed_structure_is_not_collapsed() {
    let state = AliasState::default().defined("T", definition());
    let expanded = state.expand(&Object::atom("T"));
    let changed = expanded.map_children(|child| {
        if *child == Object::atom("B") {
            Object::atom("C")
        } else {
            child.clone()
        }
    });

    // The tag travelled with the node but the hash no longer matches
    assert!(changed.get(ALIAS_KEY).is_some());
    assert_eq!(
        collapse(&changed),
        Object::rew(Object::atom("A"), "=>", Object::atom("C"))
    );
}

#[test]
fn test_expand_enters_goals() {
    let state = AliasState::default().defined("T", definition());
    let goal = Object::goal(Object::atom("T"), Object::atom("T"), "=>");

    let expanded = state.expand(&goal);
    assert_eq!(expanded.as_goal().map(|g| g.term.clone()), Some(definition()));
    assert_eq!(collapse(&expanded), goal);
}

#[test]
fn test_redefinition_replaces_binding() {
    let state = AliasState::default()
        .defined("T", definition())
        .defined("T", Object::atom("C"));
    assert_eq!(state.len(), 1);
    assert_eq!(state.get("T"), Some(&Object::atom("C")));
    assert_eq!(state.expand(&Object::atom("T")), Object::atom("C"));
}

use crate::object::{identify, Object, ObjectKind};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

fn hash_of(obj: &Object) -> u64 {
    let mut hasher = DefaultHasher::new();
    obj.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_equality_ignores_aux_data() {
    let plain = Object::term("f", vec![Object::atom("a"), Object::hole("x")]);
    let tagged = plain.with_result("Result: []").with_data("origin", "test");

    assert_eq!(plain, tagged);
    assert_eq!(hash_of(&plain), hash_of(&tagged));
    assert_eq!(plain.content_hash(), tagged.content_hash());
    assert!(!plain.same(&tagged));
}

#[test]
fn test_equality_is_structural() {
    let a = Object::rew(Object::atom("a"), "=>", Object::atom("b"));
    let b = Object::rew(Object::atom("a"), "=>", Object::atom("b"));
    let other_symbol = Object::rew(Object::atom("a"), "->", Object::atom("b"));
    let swapped = Object::rew(Object::atom("b"), "=>", Object::atom("a"));

    assert_eq!(a, b);
    assert_ne!(a, other_symbol);
    assert_ne!(a, swapped);
    assert_ne!(Object::atom("a"), Object::hole("a"));
    assert_ne!(
        Object::term("f", vec![Object::atom("a")]),
        Object::term("f", vec![Object::atom("a"), Object::atom("a")])
    );
}

#[test]
fn test_accessors_follow_the_variant() {
    let rew = Object::rew(Object::atom("a"), "=>", Object::atom("b"));
    assert_eq!(rew.symbol(), Some("=>"));
    assert_eq!(rew.left(), Some(&Object::atom("a")));
    assert_eq!(rew.right(), Some(&Object::atom("b")));
    assert_eq!(rew.name(), None);
    assert_eq!(rew.arity(), 2);

    let comp = Object::comp(Object::atom("a"), rew.clone());
    assert_eq!(comp.symbol(), None);
    assert_eq!(comp.right(), Some(&rew));

    let hole = Object::hole("x");
    assert_eq!(hole.name(), Some("x"));
    assert!(hole.children().is_empty());
    assert_eq!(hole.left(), None);

    let atom = Object::atom("a");
    assert!(atom.is_atom());
    assert!(!Object::term("f", vec![atom.clone()]).is_atom());
}

#[test]
fn test_goals_are_leaves() {
    let statement = Object::rew(Object::atom("A"), "=>", Object::atom("B"));
    let goal = Object::goal(statement.clone(), statement.clone(), "=>");

    assert!(goal.is_goal());
    assert!(goal.children().is_empty());
    assert_eq!(goal.arity(), 0);
    assert_eq!(goal.as_goal().map(|g| &g.term), Some(&statement));
    assert!(goal.hole_names().is_empty());
}

#[test]
fn test_get_child_follows_index_paths() {
    let obj = Object::rew(
        Object::term("f", vec![Object::atom("a"), Object::atom("b")]),
        "=>",
        Object::atom("c"),
    );
    assert_eq!(obj.get_child(&[]), Some(&obj));
    assert_eq!(obj.get_child(&[0, 1]), Some(&Object::atom("b")));
    assert_eq!(obj.get_child(&[1]), Some(&Object::atom("c")));
    assert_eq!(obj.get_child(&[0, 2]), None);
    assert_eq!(obj.get_child(&[2]), None);
}

#[test]
fn test_map_children_keeps_aux_data() {
    let obj = Object::term("f", vec![Object::atom("a")]).with_data("tag", 7);
    let mapped = obj.map_children(|_| Object::atom("b"));

    assert_eq!(mapped, Object::term("f", vec![Object::atom("b")]));
    assert_eq!(mapped.get("tag").and_then(|v| v.as_u64()), Some(7));
}

#[test]
fn test_rename_holes_only_touches_listed_names() {
    let obj = Object::term("f", vec![Object::hole("x"), Object::hole("y")]);
    let renaming = BTreeMap::from([("x".to_string(), "z".to_string())]);

    let renamed = obj.rename_holes(&renaming);
    assert_eq!(
        renamed,
        Object::term("f", vec![Object::hole("z"), Object::hole("y")])
    );
    assert_eq!(
        renamed.hole_names().into_iter().collect::<Vec<_>>(),
        vec!["y".to_string(), "z".to_string()]
    );
}

#[test]
fn test_without_data_and_merge() {
    let obj = Object::atom("a").with_data("x", 1).with_data("y", 2);
    let stripped = obj.without_data(&["x"]);
    assert!(stripped.get("x").is_none());
    assert!(stripped.get("y").is_some());

    let merged = Object::atom("b").merged_with(obj.data());
    assert_eq!(merged.data().len(), 2);
    assert_eq!(merged, Object::atom("b"));
}

#[test]
fn test_identify_builds_the_reflexive_rewriting() {
    let term = Object::term("f", vec![Object::atom("a")]);
    let id = identify(&term, "=>");
    assert!(matches!(id.kind(), ObjectKind::Rew { symbol, .. } if symbol == "=>"));
    assert_eq!(id.left(), id.right());
}

#[test]
fn test_serialize_tags_the_variant() {
    let obj = Object::rew(Object::hole("x"), "=>", Object::atom("a")).with_result("[]");
    let json = serde_json::to_value(&obj).unwrap();

    assert_eq!(json["type"], "Rew");
    assert_eq!(json["symbol"], "=>");
    assert_eq!(json["left"]["type"], "Hole");
    assert_eq!(json["left"]["name"], "x");
    assert_eq!(json["right"]["name"], "a");
    assert!(json["right"].get("children").is_none());
    assert_eq!(json["data"]["result"], "[]");
}

#[test]
fn test_depth() {
    assert_eq!(Object::atom("a").depth(), 1);
    let term = Object::term("f", vec![Object::atom("a"), Object::term("g", vec![Object::hole("x")])]);
    assert_eq!(term.depth(), 3);
    assert_eq!(Object::rew(term, "=>", Object::atom("b")).depth(), 4);
}

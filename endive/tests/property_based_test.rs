use endive::state::{BuildState, GoalState};
use endive::{
    apply, check, compose_rews, match_left, reduce, Assignment, Context, Engine, Object,
    ObjectKind,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

const MAX_STEPS: usize = 100;

fn ground_term() -> impl Strategy<Value = Object> {
    let leaf = prop::sample::select(vec!["a", "b", "c", "zero"]).prop_map(|name| Object::atom(name));
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (prop::sample::select(vec!["f", "g"]), prop::collection::vec(inner.clone(), 1..=2))
                .prop_map(|(name, children)| Object::term(name, children)),
            (inner.clone(), inner).prop_map(|(l, r)| Object::rew(l, "=>", r)),
        ]
    })
}

fn pattern() -> impl Strategy<Value = Object> {
    let leaf = prop_oneof![
        prop::sample::select(vec!["a", "b", "c"]).prop_map(|name| Object::atom(name)),
        prop::sample::select(vec!["x", "y", "z"]).prop_map(|name| Object::hole(name)),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        (prop::sample::select(vec!["f", "g"]), prop::collection::vec(inner, 1..=2))
            .prop_map(|(name, children)| Object::term(name, children))
    })
}

fn rule() -> impl Strategy<Value = Object> {
    (pattern(), pattern()).prop_map(|(l, r)| Object::rew(l, "=>", r))
}

fn ground_assignment() -> impl Strategy<Value = Assignment> {
    prop::collection::btree_map(
        prop::sample::select(vec!["x".to_string(), "y".to_string(), "z".to_string()]),
        ground_term(),
        0..=3,
    )
}

/// Rename holes to `h0, h1, ...` in order of first occurrence
fn canonical(obj: &Object) -> Object {
    fn collect(obj: &Object, order: &mut Vec<String>) {
        if let ObjectKind::Hole { name } = obj.kind() {
            if !order.contains(name) {
                order.push(name.clone());
            }
        }
        for child in obj.children() {
            collect(child, order);
        }
    }
    let mut order = Vec::new();
    collect(obj, &mut order);
    let renaming: BTreeMap<String, String> = order
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, format!("h{}", i)))
        .collect();
    obj.rename_holes(&renaming)
}

fn fresh_names(obj: &Object) -> BTreeMap<String, String> {
    obj.hole_names()
        .into_iter()
        .map(|name| {
            let fresh = format!("{}_renamed", name);
            (name, fresh)
        })
        .collect()
}

const SCRIPT_LINES: &[&str] = &[
    "Axiom A => B",
    "Axiom A",
    "Goal A => B",
    "Goal B",
    "Intro",
    "By A => B",
    "Done",
    "Define T, A",
    "Start f(a)",
    "Use f([x]) => g([x])",
    "Use a => b, 0",
    "Clear",
    "Functorial =>, f, 0, =>, ([x] => [y]) => f([x]) => f([y])",
    "Status",
    "Check A",
];

/// A script line, or `None` for an undo
fn script_step() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        3 => prop::sample::select(SCRIPT_LINES.to_vec()).prop_map(Some),
        1 => Just(None),
    ]
}

fn run_steps(engine: &mut Engine, steps: &[Option<&str>]) {
    for step in steps {
        match step {
            Some(line) => {
                let _ = engine.process_line(line);
            }
            None => {
                engine.undo();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_equality_ignores_aux_data(term in ground_term(), tag in "[a-z]{1,8}") {
        let tagged = term.with_data("alias", tag).with_result("[] tagged");
        prop_assert_eq!(&tagged, &term);
        prop_assert_eq!(tagged.content_hash(), term.content_hash());
    }

    #[test]
    fn prop_ground_substitution_is_idempotent(term in pattern(), assignment in ground_assignment()) {
        let once = apply(&term, &assignment);
        prop_assert_eq!(apply(&once, &assignment), once);
    }

    #[test]
    fn prop_match_left_is_sound(concrete in ground_term(), pat in pattern()) {
        if let Some(assignment) = match_left(&concrete, &pat) {
            prop_assert_eq!(apply(&pat, &assignment), concrete);
        }
    }

    #[test]
    fn prop_pattern_matches_its_instances(pat in pattern(), assignment in ground_assignment()) {
        let instance = apply(&pat, &assignment);
        if instance.hole_names().is_empty() {
            prop_assert!(match_left(&instance, &pat).is_some());
        }
    }

    #[test]
    fn prop_reduce_is_idempotent(start in ground_term(), rules in prop::collection::vec(rule(), 0..3)) {
        let term = rules
            .into_iter()
            .fold(start, |acc, rule| Object::comp(acc, rule));
        if let Ok(normal) = reduce(&term, MAX_STEPS) {
            prop_assert_eq!(reduce(&normal, MAX_STEPS).ok(), Some(normal));
        }
    }

    #[test]
    fn prop_buildability_is_monotonic(
        term in ground_term(),
        known in prop::collection::vec(ground_term(), 0..4),
        extra in ground_term(),
    ) {
        let context = known
            .iter()
            .fold(Context::seeded(), |ctx, t| ctx.with("=>", t.clone()));
        if let Ok(verdict) = check(&term, Some("=>"), &context, MAX_STEPS) {
            if verdict.is_buildable() {
                let larger = context.with("=>", extra);
                prop_assert!(check(&term, Some("=>"), &larger, MAX_STEPS).unwrap().is_buildable());
            }
        }
    }

    #[test]
    fn prop_compose_ignores_hole_names(a in rule(), b in rule()) {
        let renamed = a.rename_holes(&fresh_names(&a));
        let original = compose_rews(&a, &b).map(|c| canonical(&c));
        let after_renaming = compose_rews(&renamed, &b).map(|c| canonical(&c));
        prop_assert_eq!(original, after_renaming);
    }

    #[test]
    fn prop_undo_returns_to_the_empty_engine(
        lines in prop::collection::vec(prop::sample::select(SCRIPT_LINES.to_vec()), 0..12)
    ) {
        let mut engine = Engine::new();
        for line in &lines {
            let _ = engine.process_line(line);
        }
        let depth = engine.undo_depth();
        for _ in 0..depth {
            prop_assert!(engine.undo().is_some());
        }
        prop_assert_eq!(engine.undo(), None);
        prop_assert_eq!(&*engine.goal_state(), &GoalState::default());
        prop_assert_eq!(&*engine.build_state(), &BuildState::default());
    }

    #[test]
    fn prop_rollback_restores_the_breakpoint_or_refuses(
        before in prop::collection::vec(script_step(), 0..8),
        after in prop::collection::vec(script_step(), 0..8),
    ) {
        let mut engine = Engine::new();
        run_steps(&mut engine, &before);
        engine.breakpoint("mark");
        let goal_state = engine.goal_state();
        let build_state = engine.build_state();
        let depth = engine.undo_depth();

        run_steps(&mut engine, &after);
        let goal_before_rollback = engine.goal_state();
        let build_before_rollback = engine.build_state();

        if engine.rollback("mark") {
            prop_assert_eq!(&*engine.goal_state(), &*goal_state);
            prop_assert_eq!(&*engine.build_state(), &*build_state);
            prop_assert_eq!(engine.undo_depth(), depth);
        } else {
            // Only an undo reaching below the breakpoint can invalidate it
            prop_assert!(after.contains(&None));
            prop_assert_eq!(&*engine.goal_state(), &*goal_before_rollback);
            prop_assert_eq!(&*engine.build_state(), &*build_before_rollback);
        }
    }
}

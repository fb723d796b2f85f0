//! Goal-directed proofs
//!
//! The proof is a term whose goal leaves are the obligations still open.
//! Directives always work on the active goal, the first goal leaf in
//! left-to-right depth-first order, and replace exactly that leaf.
//!
//! The hypotheses in scope at a goal are the left sides of every rewriting
//! whose right side contains it. They extend the generic context for the
//! duration of one directive and are never stored.

use super::Step;
use crate::buildability::{check, Verdict};
use crate::context::{Context, DEFAULT_SYMBOL};
use crate::error::EndiveError;
use crate::object::{GoalData, Object, ObjectKind};
use crate::operations::{apply, reduce, unify, Assignment};
use crate::EndiveResult;
use std::collections::{BTreeMap, BTreeSet};

/// Premises `By` is able to split off a rule
pub const MAX_PREMISES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct GoalState {
    /// Partial proof term
    pub proof: Option<Object>,
    /// The statement the current proof was started for
    pub statement: Option<Object>,
    /// Axioms and completed statements, by symbol
    pub context: Context,
}

impl Default for GoalState {
    fn default() -> Self {
        Self {
            proof: None,
            statement: None,
            context: Context::seeded(),
        }
    }
}

/// The goal directives work on, with the context in scope at it
#[derive(Debug, Clone)]
pub struct ActiveGoal {
    pub goal: GoalData,
    pub context: Context,
}

impl GoalState {
    /// Open goals in depth-first order
    pub fn open_goals(&self) -> Vec<&GoalData> {
        let mut goals = Vec::new();
        if let Some(proof) = &self.proof {
            collect_goals(proof, &mut goals);
        }
        goals
    }

    pub fn active_goal(&self) -> Option<ActiveGoal> {
        let (goal, context) = locate(self.proof.as_ref()?, &self.context)?;
        Some(ActiveGoal { goal, context })
    }

    /// The generic context plus the hypotheses at the active goal
    pub fn active_context(&self) -> Context {
        self.active_goal()
            .map_or_else(|| self.context.clone(), |active| active.context)
    }

    pub fn is_complete(&self) -> bool {
        self.proof.is_some() && self.open_goals().is_empty()
    }

    fn with_proof(&self, proof: Object) -> Self {
        Self {
            proof: Some(proof),
            statement: self.statement.clone(),
            context: self.context.clone(),
        }
    }
}

fn collect_goals<'a>(obj: &'a Object, goals: &mut Vec<&'a GoalData>) {
    match obj.kind() {
        ObjectKind::Goal(goal) => goals.push(goal),
        _ => {
            for child in obj.children() {
                collect_goals(child, goals);
            }
        }
    }
}

fn locate(obj: &Object, scope: &Context) -> Option<(GoalData, Context)> {
    match obj.kind() {
        ObjectKind::Goal(goal) => Some((goal.clone(), scope.clone())),
        ObjectKind::Rew {
            left,
            symbol,
            right,
        } => locate(left, scope).or_else(|| locate(right, &scope.with(symbol, left.clone()))),
        _ => obj
            .children()
            .into_iter()
            .find_map(|child| locate(child, scope)),
    }
}

/// Replace the first goal leaf of `obj`
fn replace_first_goal(obj: &Object, replacement: &Object) -> Option<Object> {
    if obj.is_goal() {
        return Some(replacement.clone());
    }
    let children = obj.children();
    let (position, new_child) = children
        .iter()
        .enumerate()
        .find_map(|(i, child)| replace_first_goal(child, replacement).map(|new| (i, new)))?;
    let mut index = 0;
    Some(obj.map_children(|child| {
        let mapped = if index == position {
            new_child.clone()
        } else {
            child.clone()
        };
        index += 1;
        mapped
    }))
}

fn make_goal(term: &Object, symbol: &str, max_steps: usize) -> EndiveResult<Object> {
    Ok(Object::goal(term.clone(), reduce(term, max_steps)?, symbol))
}

fn no_goal() -> Object {
    Object::atom("NoGoal").with_result("No active goal")
}

/// `Goal term`: start a new proof, dropping any proof in progress.
pub fn start(state: &GoalState, term: &Object, max_steps: usize) -> EndiveResult<Step<GoalState>> {
    let symbol = term.symbol().unwrap_or(DEFAULT_SYMBOL);
    let next = GoalState {
        proof: Some(make_goal(term, symbol, max_steps)?),
        statement: Some(term.clone()),
        context: state.context.clone(),
    };
    Ok(Step::next(next, term.with_result("New goal: []")))
}

/// `Intro`: assume the premise of a rewriting goal and narrow the goal to
/// its conclusion.
pub fn intro(state: &GoalState, max_steps: usize) -> EndiveResult<Step<GoalState>> {
    let (Some(proof), Some(active)) = (&state.proof, state.active_goal()) else {
        return Ok(Step::rejected(no_goal()));
    };
    let ObjectKind::Rew {
        left,
        symbol,
        right,
    } = active.goal.term.kind()
    else {
        return Ok(Step::rejected(
            active.goal.term.with_result("Goal [] is not a rewriting"),
        ));
    };

    let replacement = Object::rew(left.clone(), symbol.clone(), make_goal(right, symbol, max_steps)?);
    let Some(proof) = replace_first_goal(proof, &replacement) else {
        return Ok(Step::rejected(no_goal()));
    };
    let result = Object::term("Intro", vec![left.clone(), right.clone()])
        .with_result("Assuming [0], new goal: [1]");
    Ok(Step::next(state.with_proof(proof), result))
}

/// How a rule was matched against the active goal
struct Decomposition {
    premises: Vec<Object>,
    conclusion: Object,
    /// Left side of a rewriting goal whose right side the conclusion matched
    hypothesis: Option<Object>,
    assignment: Assignment,
}

/// Peel premises off `rule` until what is left unifies with the goal, or
/// with the right side of the goal when the goal is a rewriting under the
/// goal's own symbol.
fn decompose(rule: &Object, goal: &GoalData) -> Option<Decomposition> {
    let hypothetical = match goal.reduced.kind() {
        ObjectKind::Rew {
            left,
            symbol,
            right,
        } if *symbol == goal.symbol => Some((left, right)),
        _ => None,
    };

    let mut premises = Vec::new();
    let mut rest = rule.clone();
    loop {
        if !premises.is_empty() {
            if let Some((left, right)) = hypothetical {
                if let Some(assignment) = unify(&rest, right) {
                    return Some(Decomposition {
                        premises,
                        conclusion: rest,
                        hypothesis: Some(left.clone()),
                        assignment,
                    });
                }
            }
        }
        if let Some(assignment) = unify(&rest, &goal.reduced) {
            return Some(Decomposition {
                premises,
                conclusion: rest,
                hypothesis: None,
                assignment,
            });
        }
        let next = match rest.kind() {
            ObjectKind::Rew {
                left,
                symbol,
                right,
            } if *symbol == goal.symbol => {
                premises.push(left.clone());
                right.clone()
            }
            _ => return None,
        };
        rest = next;
    }
}

/// Rename the holes of `rule` that also occur in `avoid`
fn renamed_apart(rule: &Object, avoid: &BTreeSet<String>) -> Object {
    let names = rule.hole_names();
    let mut taken: BTreeSet<String> = avoid.union(&names).cloned().collect();
    let mut renaming = BTreeMap::new();
    for name in names.intersection(avoid) {
        let mut fresh = name.clone();
        while taken.contains(&fresh) {
            fresh.push('\'');
        }
        taken.insert(fresh.clone());
        renaming.insert(name.clone(), fresh);
    }
    rule.rename_holes(&renaming)
}

/// The lemma `(Y ~ (Z ~ W)) ~ ((X ~ Y) ~ ((X ~ Z) ~ (X ~ W)))` under
/// `symbol`, with four fresh holes.
///
/// It turns a two-premise rule into one that takes the premises as
/// rewritings out of a shared hypothesis `X`.
pub fn currifier(symbol: &str) -> Object {
    currifier_over(
        symbol,
        Object::hole("X"),
        Object::hole("Y"),
        Object::hole("Z"),
        Object::hole("W"),
    )
}

// Built directly from the instances rather than through `apply`, so holes
// inside the instances can never be captured by the lemma's own holes.
fn currifier_over(symbol: &str, x: Object, y: Object, z: Object, w: Object) -> Object {
    let rew = |left: Object, right: Object| Object::rew(left, symbol, right);
    rew(
        rew(y.clone(), rew(z.clone(), w.clone())),
        rew(
            rew(x.clone(), y),
            rew(rew(x.clone(), z), rew(x, w)),
        ),
    )
}

/// `By rule` / `By rule, force`: backward step through `rule`.
///
/// Premises split off the rule become new goals placed in front of the rule
/// in the proof, so that once proved they compose into it. A rule that is
/// not buildable is refused unless forced, in which case it becomes a goal
/// as well.
pub fn by(
    state: &GoalState,
    rule: &Object,
    force: bool,
    max_steps: usize,
) -> EndiveResult<Step<GoalState>> {
    let (Some(proof), Some(active)) = (&state.proof, state.active_goal()) else {
        return Ok(Step::rejected(no_goal()));
    };
    let goal = &active.goal;
    let symbol = goal.symbol.as_str();

    // Context entries are stored with their own hole names, so buildability
    // is decided before renaming.
    let verdict = check(rule, Some(symbol), &active.context, max_steps)?;
    if !verdict.is_buildable() && !force {
        let mut diagnostics: Vec<Object> = verdict.diagnostic().into_iter().collect();
        diagnostics.push(rule.with_result("[] is not a known rewriting, add force to use it anyway"));
        return Ok(Step::Rejected(diagnostics));
    }

    let mut goal_holes = goal.term.hole_names();
    goal_holes.extend(goal.reduced.hole_names());
    let rule = renamed_apart(rule, &goal_holes);

    let reduced_rule = reduce(&rule, max_steps)?;
    let Some(decomposition) = decompose(&reduced_rule, goal) else {
        return Ok(Step::rejected(
            Object::term("Mismatch", vec![rule.clone(), goal.term.clone()])
                .with_result("Cannot apply [0] to obtain [1]"),
        ));
    };
    if decomposition.premises.len() > MAX_PREMISES {
        return Ok(Step::rejected(rule.with_result(format!(
            "[] has {} premises, By supports at most {}",
            decomposition.premises.len(),
            MAX_PREMISES
        ))));
    }

    let assignment = &decomposition.assignment;
    let instantiated = apply(&rule, assignment);
    let hypothesis = decomposition.hypothesis.as_ref().map(|x| apply(x, assignment));
    let premises: Vec<Object> = decomposition
        .premises
        .iter()
        .map(|premise| {
            let premise = apply(premise, assignment);
            match &hypothesis {
                Some(x) => Object::rew(x.clone(), symbol, premise),
                None => premise,
            }
        })
        .collect();

    let mut new_goals = Vec::new();
    let justification = if verdict.is_buildable() {
        instantiated.clone()
    } else {
        new_goals.push(instantiated.clone());
        make_goal(&instantiated, symbol, max_steps)?
    };

    let premise_goals = premises
        .iter()
        .map(|premise| make_goal(premise, symbol, max_steps))
        .collect::<EndiveResult<Vec<_>>>()?;

    let replacement = match (premise_goals.as_slice(), &hypothesis) {
        ([], _) => justification,
        ([first], _) => Object::comp(first.clone(), justification),
        ([first, second], None) => {
            Object::comp(second.clone(), Object::comp(first.clone(), justification))
        }
        ([first, second], Some(x)) => {
            let currified = currifier_over(
                symbol,
                x.clone(),
                apply(&decomposition.premises[0], assignment),
                apply(&decomposition.premises[1], assignment),
                apply(&decomposition.conclusion, assignment),
            );
            Object::comp(
                second.clone(),
                Object::comp(first.clone(), Object::comp(justification, currified)),
            )
        }
        _ => {
            return Err(EndiveError::Engine(format!(
                "unexpected premise count {}",
                premise_goals.len()
            )))
        }
    };

    // Goals come out in the order they will be met
    let mut results: Vec<Object> = premises
        .iter()
        .rev()
        .chain(new_goals.iter())
        .map(|term| term.with_result("New goal: []"))
        .collect();
    if results.is_empty() {
        results.push(instantiated.with_result("Goal closed by []"));
    }

    let Some(proof) = replace_first_goal(proof, &replacement) else {
        return Ok(Step::rejected(no_goal()));
    };
    advance(state, proof, results, max_steps)
}

/// `Done` / `Done candidate`: close the active goal.
///
/// Without a candidate the goal's statement must be known in the active
/// context. A candidate closes the goal when it is buildable and reduces to
/// the goal, or when it reduces to a rewriting whose left side is buildable
/// and whose right side reduces to the goal.
pub fn done(
    state: &GoalState,
    candidate: Option<&Object>,
    max_steps: usize,
) -> EndiveResult<Step<GoalState>> {
    let (Some(proof), Some(active)) = (&state.proof, state.active_goal()) else {
        return Ok(Step::rejected(no_goal()));
    };
    let goal = &active.goal;
    let symbol = goal.symbol.as_str();

    let replacement = match candidate {
        None => {
            if !active.context.contains(symbol, &goal.term) {
                return Ok(Step::rejected(
                    goal.term.with_result("Goal not completed: []"),
                ));
            }
            goal.term.clone()
        }
        Some(candidate) => match close_with(candidate, goal, &active.context, max_steps)? {
            Ok(replacement) => replacement,
            Err(diagnostics) => return Ok(Step::Rejected(diagnostics)),
        },
    };

    let Some(proof) = replace_first_goal(proof, &replacement) else {
        return Ok(Step::rejected(no_goal()));
    };
    let results = vec![replacement.with_result("Goal closed by []")];
    advance(state, proof, results, max_steps)
}

fn close_with(
    candidate: &Object,
    goal: &GoalData,
    context: &Context,
    max_steps: usize,
) -> EndiveResult<Result<Object, Vec<Object>>> {
    let symbol = goal.symbol.as_str();
    let verdict = check(candidate, Some(symbol), context, max_steps)?;
    let reduced = reduce(candidate, max_steps)?;
    if verdict.is_buildable() && reduced == goal.reduced {
        return Ok(Ok(candidate.clone()));
    }

    if let ObjectKind::Rew { left, right, .. } = reduced.kind() {
        let premise = check(left, Some(symbol), context, max_steps)?;
        if premise.is_buildable() && reduce(right, max_steps)? == goal.reduced {
            return Ok(Ok(Object::comp(left.clone(), candidate.clone())));
        }
    }

    let mut diagnostics: Vec<Object> = match verdict {
        Verdict::Buildable => Vec::new(),
        unbuildable => unbuildable.diagnostic().into_iter().collect(),
    };
    diagnostics.push(
        Object::term("Mismatch", vec![candidate.clone(), goal.term.clone()])
            .with_result("[0] does not prove [1]"),
    );
    Ok(Err(diagnostics))
}

/// Commit a new proof term. When no goal is left, the statement joins the
/// generic context so later proofs can use it.
fn advance(
    state: &GoalState,
    proof: Object,
    mut results: Vec<Object>,
    max_steps: usize,
) -> EndiveResult<Step<GoalState>> {
    let mut next = state.with_proof(proof.clone());
    if next.open_goals().is_empty() {
        if let Some(statement) = &state.statement {
            let symbol = statement.symbol().unwrap_or(DEFAULT_SYMBOL);
            next.context.push(symbol, statement.clone());
        }
        results.push(reduce(&proof, max_steps)?.with_result("Goal completed: []"));
    }
    Ok(Step::Next(next, results))
}

/// `Axiom symbol, term`
pub fn axiom(state: &GoalState, symbol: &str, term: &Object) -> Step<GoalState> {
    let mut next = state.clone();
    next.context.push(symbol, term.clone());
    Step::next(next, term.with_result(format!("Axiom under {}: []", symbol)))
}

/// `Status`: open goals, the proof so far and the generic context
pub fn status(state: &GoalState) -> Vec<Object> {
    let mut results = Vec::new();
    match &state.proof {
        None => results.push(Object::atom("NoGoal").with_result("No goal set")),
        Some(proof) => {
            let goals = state.open_goals();
            if goals.is_empty() {
                results.push(proof.with_result("Proof complete: []"));
            } else {
                results.extend(goals.iter().map(|goal| goal.term.with_result("Open goal: []")));
                results.push(proof.with_result("Proof: []"));
            }
        }
    }
    results.extend(
        state
            .context
            .iter()
            .map(|(symbol, term)| term.with_result(format!("Known under {}: []", symbol))),
    );
    results
}

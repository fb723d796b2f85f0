use super::Assignment;
use crate::object::{Object, ObjectKind};

/// Replace every hole bound in `assignment` by its value.
///
/// Bound values are themselves substituted, so one pass leaves no hole
/// that the assignment binds. A hole met again while its own value is being
/// expanded is left in place, which keeps cyclic assignments finite.
/// Unbound holes are untouched and auxiliary data is kept on every rebuilt
/// node.
pub fn apply(term: &Object, assignment: &Assignment) -> Object {
    if assignment.is_empty() {
        return term.clone();
    }
    let mut expanding = Vec::new();
    substitute(term, assignment, &mut expanding)
}

fn substitute(term: &Object, assignment: &Assignment, expanding: &mut Vec<String>) -> Object {
    term.rewrite(&mut |obj: &Object| match obj.kind() {
        ObjectKind::Hole { name } => Some(match assignment.get(name) {
            Some(bound) if !expanding.contains(name) => {
                expanding.push(name.clone());
                let resolved = substitute(bound, assignment, expanding);
                expanding.pop();
                resolved
            }
            _ => obj.clone(),
        }),
        _ => None,
    })
}

//! Integer literals on the way in, Peano chains on the way out

use super::{History, HookFlow, Registry, StatefulHelper, ALL};
use crate::error::EndiveError;
use crate::object::{Object, ObjectKind};
use crate::{EndiveResult, ResourceLimits};
use tracing::warn;

pub const ZERO: &str = "zero";
pub const SUCCESSOR: &str = "S";

/// Value of a digit atom or of a chain `S(...S(zero)...)`
pub fn numeral_value(obj: &Object) -> Option<usize> {
    let mut depth = 0;
    let mut current = obj;
    loop {
        match current.kind() {
            ObjectKind::Term { name, children } if children.is_empty() => {
                return if name == ZERO {
                    Some(depth)
                } else if depth == 0 && is_digits(name) {
                    name.parse().ok()
                } else {
                    None
                };
            }
            ObjectKind::Term { name, children } if name == SUCCESSOR && children.len() == 1 => {
                depth += 1;
                current = &children[0];
            }
            _ => return None,
        }
    }
}

fn is_digits(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

pub fn peano(n: usize) -> Object {
    (0..n).fold(Object::atom(ZERO), |inner, _| {
        Object::term(SUCCESSOR, vec![inner])
    })
}

/// Expand digit atoms up to `max_numeral`; larger literals stay atoms.
pub fn integer_to_peano(obj: &Object, max_numeral: usize) -> Object {
    obj.rewrite(&mut |node: &Object| {
        let name = node.name().filter(|name| node.is_atom() && is_digits(name))?;
        match name.parse::<usize>() {
            Ok(n) if n <= max_numeral => Some(peano(n).merged_with(node.data())),
            _ => {
                warn!(literal = name, max_numeral, "numeral left unexpanded");
                Some(node.clone())
            }
        }
    })
}

/// Depth `obj` will have once [`integer_to_peano`] has run, computed
/// without building the chains
pub fn expanded_depth(obj: &Object, max_numeral: usize) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(obj, 1)];
    while let Some((node, depth)) = pending.pop() {
        let chain = node
            .name()
            .filter(|name| node.is_atom() && is_digits(name))
            .and_then(|name| name.parse::<usize>().ok())
            .filter(|&n| n <= max_numeral)
            .unwrap_or(0);
        deepest = deepest.max(depth + chain);
        pending.extend(node.children().into_iter().map(|child| (child, depth + 1)));
    }
    deepest
}

/// Fold every Peano chain back into a digit atom
pub fn peano_to_integer(obj: &Object) -> Object {
    obj.rewrite(&mut |node: &Object| {
        if let Some(converted) = node.map_goal(peano_to_integer) {
            return Some(converted);
        }
        if node.is_hole() || !matches!(node.name(), Some(ZERO) | Some(SUCCESSOR)) {
            return None;
        }
        let n = numeral_value(node)?;
        Some(Object::atom(n.to_string()).merged_with(node.data()))
    })
}

pub struct PeanoHelper {
    registry: Registry<Self>,
    history: History<()>,
    max_numeral: usize,
    max_term_depth: usize,
}

impl PeanoHelper {
    pub fn new(limits: &ResourceLimits) -> Self {
        Self {
            registry: Registry::<Self>::new().hook(&[ALL], Self::all_forhook, Some(Self::all_backhook)),
            history: History::default(),
            max_numeral: limits.max_numeral,
            max_term_depth: limits.max_term_depth,
        }
    }

    fn all_forhook(&mut self, _directive: &str, arguments: Vec<Object>) -> EndiveResult<HookFlow> {
        // Refuse before building a chain too deep to traverse
        for arg in &arguments {
            let depth = expanded_depth(arg, self.max_numeral);
            if depth > self.max_term_depth {
                return Err(EndiveError::term_too_deep(self.max_term_depth, depth));
            }
        }
        Ok(HookFlow::Continue(
            arguments
                .iter()
                .map(|arg| integer_to_peano(arg, self.max_numeral))
                .collect(),
        ))
    }

    fn all_backhook(&mut self, _directive: &str, results: Vec<Object>) -> Vec<Object> {
        results.iter().map(peano_to_integer).collect()
    }
}

impl StatefulHelper for PeanoHelper {
    type State = ();

    const NAME: &'static str = "peano";

    fn registry(&self) -> &Registry<Self> {
        &self.registry
    }

    fn history(&self) -> &History<()> {
        &self.history
    }

    fn history_mut(&mut self) -> &mut History<()> {
        &mut self.history
    }
}

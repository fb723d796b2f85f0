//! Congruence rules lifting a rewriting at a child position to the
//! enclosing term

use crate::object::{Object, ObjectKind};
use crate::operations::reduce;
use crate::EndiveResult;
use std::collections::BTreeMap;
use std::fmt;

/// Where a lifting applies: a rewriting under `inner_symbol` at child
/// `position` of a `constructor` term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctorialKey {
    pub inner_symbol: String,
    pub constructor: String,
    pub position: usize,
}

impl fmt::Display for FunctorialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.inner_symbol, self.constructor, self.position
        )
    }
}

/// The rule producing the lifted rewriting, and the symbol it rewrites under
#[derive(Debug, Clone, PartialEq)]
pub struct Lifting {
    pub outer_symbol: String,
    pub rule: Object,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctorialState {
    liftings: BTreeMap<FunctorialKey, Lifting>,
}

impl FunctorialState {
    pub fn registered(&self, key: FunctorialKey, lifting: Lifting) -> Self {
        let mut liftings = self.liftings.clone();
        liftings.insert(key, lifting);
        Self { liftings }
    }

    pub fn lookup(&self, inner_symbol: &str, constructor: &str, position: usize) -> Option<&Lifting> {
        self.liftings.get(&FunctorialKey {
            inner_symbol: inner_symbol.to_string(),
            constructor: constructor.to_string(),
            position,
        })
    }

    pub fn len(&self) -> usize {
        self.liftings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.liftings.is_empty()
    }
}

/// Why a rule could not be wrapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapFailure {
    NoWorkingTerm,
    NotARewriting,
    /// The path went through something that is not a constructor application
    NotATerm(String),
    OutOfBounds { position: usize, constructor: String },
    Missing(FunctorialKey),
}

impl fmt::Display for WrapFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapFailure::NoWorkingTerm => {
                write!(f, "No working term, use Start before Use with positions")
            }
            WrapFailure::NotARewriting => write!(f, "Can only wrap rewriting rules"),
            WrapFailure::NotATerm(found) => {
                write!(f, "Cannot descend into {}, not a constructor application", found)
            }
            WrapFailure::OutOfBounds {
                position,
                constructor,
            } => write!(f, "Position {} out of bounds for {}", position, constructor),
            WrapFailure::Missing(key) => write!(f, "No functorial rule for {}", key),
        }
    }
}

/// Lift `rule` to the subterm of `working_term` found along `positions`.
///
/// The path is walked top-down to collect `(constructor, position)` pairs;
/// liftings are then composed in innermost first, each one's outer symbol
/// becoming the next lookup's inner symbol. The empty path returns the rule
/// unchanged.
pub fn wrap_rule(
    state: &FunctorialState,
    working_term: Option<&Object>,
    rule: &Object,
    positions: &[usize],
    max_steps: usize,
) -> EndiveResult<Result<Object, WrapFailure>> {
    if positions.is_empty() {
        return Ok(Ok(rule.clone()));
    }
    let Some(working_term) = working_term else {
        return Ok(Err(WrapFailure::NoWorkingTerm));
    };
    let Some(symbol) = rule.symbol() else {
        return Ok(Err(WrapFailure::NotARewriting));
    };

    let mut path = Vec::with_capacity(positions.len());
    let mut current = working_term;
    for &position in positions {
        let ObjectKind::Term { name, children } = current.kind() else {
            return Ok(Err(WrapFailure::NotATerm(current.to_string())));
        };
        let Some(child) = children.get(position) else {
            return Ok(Err(WrapFailure::OutOfBounds {
                position,
                constructor: name.clone(),
            }));
        };
        path.push((name.as_str(), position));
        current = child;
    }

    let mut wrapped = rule.clone();
    let mut inner_symbol = symbol.to_string();
    for &(constructor, position) in path.iter().rev() {
        let Some(lifting) = state.lookup(&inner_symbol, constructor, position) else {
            return Ok(Err(WrapFailure::Missing(FunctorialKey {
                inner_symbol,
                constructor: constructor.to_string(),
                position,
            })));
        };
        wrapped = reduce(&Object::comp(wrapped, lifting.rule.clone()), max_steps)?;
        inner_symbol = lifting.outer_symbol.clone();
    }
    Ok(Ok(wrapped))
}

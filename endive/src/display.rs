//! Text rendering of objects.
//!
//! The output reads back through [`crate::parser::parse_line`]: parentheses
//! are only emitted where precedence or associativity requires them. All
//! binary forms are right-associative, so an operand of equal precedence
//! needs parentheses on the left side only.

use crate::object::{Object, ObjectKind};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const PREC_COMPOSITION: u8 = 10;
const PREC_ALPHA_RULE: u8 = 20;
const PREC_SPECIAL_RULE: u8 = 30;
const PREC_ADDITION: u8 = 40;
const PREC_MULTIPLICATION: u8 = 50;
const PREC_DIVISION: u8 = 60;
const PREC_APPLICATION: u8 = 70;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Infix rendering for the arithmetic constructors produced by the parser
fn infix_operator(name: &str) -> Option<(&'static str, u8)> {
    match name {
        "plus" => Some(("+", PREC_ADDITION)),
        "minus" => Some(("-", PREC_ADDITION)),
        "mult" => Some(("*", PREC_MULTIPLICATION)),
        "div" => Some(("/", PREC_DIVISION)),
        _ => None,
    }
}

/// Rewriting symbols made of letters bind looser than operator symbols
pub fn is_alphanumeric_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

fn precedence(obj: &Object) -> u8 {
    match obj.kind() {
        ObjectKind::Comp { .. } => PREC_COMPOSITION,
        ObjectKind::Rew { symbol, .. } => {
            if is_alphanumeric_symbol(symbol) {
                PREC_ALPHA_RULE
            } else {
                PREC_SPECIAL_RULE
            }
        }
        ObjectKind::Term { name, children } if children.len() == 2 => {
            infix_operator(name).map_or(PREC_APPLICATION, |(_, prec)| prec)
        }
        _ => PREC_APPLICATION,
    }
}

fn needs_parens(child: &Object, parent_prec: u8, side: Side) -> bool {
    let child_prec = precedence(child);
    child_prec < parent_prec || (child_prec == parent_prec && side == Side::Left)
}

fn write_operand(f: &mut fmt::Formatter<'_>, child: &Object, parent_prec: u8, side: Side) -> fmt::Result {
    if needs_parens(child, parent_prec, side) {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

fn write_binary(
    f: &mut fmt::Formatter<'_>,
    left: &Object,
    operator: &str,
    right: &Object,
    prec: u8,
) -> fmt::Result {
    write_operand(f, left, prec, Side::Left)?;
    write!(f, " {} ", operator)?;
    write_operand(f, right, prec, Side::Right)
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ObjectKind::Hole { name } => write!(f, "[{}]", name),
            ObjectKind::Term { name, children } => {
                if children.is_empty() {
                    return write!(f, "{}", name);
                }
                if let (Some((operator, prec)), [left, right]) =
                    (infix_operator(name), children.as_slice())
                {
                    return write_binary(f, left, operator, right, prec);
                }
                write!(f, "{}(", name)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            ObjectKind::Rew {
                left,
                symbol,
                right,
            } => write_binary(f, left, symbol, right, precedence(self)),
            ObjectKind::Comp { left, right } => {
                write_binary(f, left, "|", right, PREC_COMPOSITION)
            }
            ObjectKind::Goal(goal) => {
                write!(f, "?")?;
                write_operand(f, &goal.term, PREC_APPLICATION, Side::Right)
            }
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[(\d+(?:\.\d+)*)?\]").expect("placeholder pattern is a valid regex")
    })
}

/// Render an object through its `"result"` template.
///
/// `[]` is replaced by the object and `[i.j.k]` by the child at that index
/// path. Paths that do not exist are left verbatim. Without a template the
/// object renders as itself.
pub fn render(obj: &Object) -> String {
    let Some(template) = obj.result() else {
        return obj.to_string();
    };

    placeholder_pattern()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let path: Option<Vec<usize>> = match caps.get(1) {
                None => Some(Vec::new()),
                Some(indices) => indices
                    .as_str()
                    .split('.')
                    .map(|index| index.parse::<usize>().ok())
                    .collect(),
            };
            path.and_then(|path| obj.get_child(&path).map(|child| child.to_string()))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Render every result object, joined with `"; "`
pub fn render_all(results: &[Object]) -> String {
    results.iter().map(render).collect::<Vec<_>>().join("; ")
}

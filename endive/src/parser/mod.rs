use crate::error::EndiveError;
use crate::object::Object;
use crate::EndiveResult;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::sync::Arc;

#[derive(Parser)]
#[grammar = "src/parser/endive.pest"]
pub struct EndiveParser;

/// Span representing a location in a proof script
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }
}

/// A parsed proof-script line
pub type Directive = (String, Vec<Object>);

/// Parse one line of proof script.
///
/// Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> EndiveResult<Option<Directive>> {
    parse_line_from(line, "<input>")
}

/// Like [`parse_line`], naming the source in parse errors
pub fn parse_line_from(line: &str, source_id: &str) -> EndiveResult<Option<Directive>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let pairs = EndiveParser::parse(Rule::line, trimmed).map_err(|e| {
        let span = match e.location {
            pest::error::InputLocation::Pos(pos) => Span {
                start: pos,
                end: pos,
                line: 1,
                col: pos + 1,
            },
            pest::error::InputLocation::Span((start, end)) => Span {
                start,
                end,
                line: 1,
                col: start + 1,
            },
        };
        let message = e.variant.message().to_string();
        if trimmed.matches('(').count() != trimmed.matches(')').count() {
            EndiveError::parse_with_suggestion(
                message,
                span,
                source_id,
                Arc::from(trimmed),
                "check that parentheses are balanced",
            )
        } else {
            EndiveError::parse(message, span, source_id, Arc::from(trimmed))
        }
    })?;

    let mut directive = None;
    let mut arguments = Vec::new();
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::directive => directive = Some(pair.as_str().to_string()),
            Rule::arguments => {
                for arg in pair.into_inner() {
                    arguments.push(parse_expression(arg)?);
                }
                break;
            }
            _ => {}
        }
    }

    match directive {
        Some(directive) => Ok(Some((directive, arguments))),
        None => Err(EndiveError::Engine(format!(
            "No directive found in '{}'",
            trimmed
        ))),
    }
}

fn unexpected(pair: &Pair<Rule>) -> EndiveError {
    EndiveError::Engine(format!(
        "Unexpected {:?} at {:?}",
        pair.as_rule(),
        Span::from_pest_span(pair.as_span())
    ))
}

/// Fold `operand (operator rest)?` into a right-associative binary node
fn parse_binary(
    pair: Pair<Rule>,
    build: impl Fn(Object, &str, Object) -> Object,
) -> EndiveResult<Object> {
    let mut inner = pair.into_inner();
    let left = match inner.next() {
        Some(operand) => parse_expression(operand)?,
        None => return Err(EndiveError::Engine("Empty expression".to_string())),
    };
    let Some(operator) = inner.next() else {
        return Ok(left);
    };
    // `arg` has no operator token: its second child is already the operand
    let (symbol, right) = match operator.as_rule() {
        Rule::arg => ("|".to_string(), operator),
        _ => {
            let symbol = operator.as_str().to_string();
            match inner.next() {
                Some(right) => (symbol, right),
                None => return Err(unexpected(&operator)),
            }
        }
    };
    Ok(build(left, &symbol, parse_expression(right)?))
}

fn parse_expression(pair: Pair<Rule>) -> EndiveResult<Object> {
    match pair.as_rule() {
        Rule::arg => parse_binary(pair, |left, _, right| Object::comp(left, right)),
        Rule::alpha_rule | Rule::special_rule => {
            parse_binary(pair, |left, symbol, right| Object::rew(left, symbol, right))
        }
        Rule::sum => parse_binary(pair, |left, op, right| {
            let name = if op == "+" { "plus" } else { "minus" };
            Object::term(name, vec![left, right])
        }),
        Rule::product => parse_binary(pair, |left, _, right| {
            Object::term("mult", vec![left, right])
        }),
        Rule::quotient => parse_binary(pair, |left, _, right| {
            Object::term("div", vec![left, right])
        }),
        Rule::application => {
            let mut inner = pair.into_inner();
            let name = match inner.next() {
                Some(name) => name.as_str().to_string(),
                None => return Err(EndiveError::Engine("Application without a name".to_string())),
            };
            let children = inner.map(parse_expression).collect::<EndiveResult<Vec<_>>>()?;
            Ok(Object::term(name, children))
        }
        Rule::atom => Ok(Object::atom(pair.as_str())),
        Rule::hole => {
            let name = pair
                .into_inner()
                .next()
                .map(|name| name.as_str().to_string())
                .unwrap_or_default();
            Ok(Object::hole(name))
        }
        Rule::group => match pair.into_inner().next() {
            Some(inner) => parse_expression(inner),
            None => Err(EndiveError::Engine("Empty parentheses".to_string())),
        },
        _ => Err(unexpected(&pair)),
    }
}

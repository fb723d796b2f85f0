use crate::parser::Span;
use std::fmt;
use std::sync::Arc;

/// Detailed error information with source location
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Span,
    pub source_id: String,
    pub source_text: Arc<str>,
    pub suggestion: Option<String>,
}

/// Hard failures of the kernel.
///
/// Proof mistakes are not errors: they come back as a failed
/// [`crate::Outcome`] carrying diagnostic objects. These variants are for
/// broken input text, runaway reductions and contract violations between
/// the kernel and its collaborators.
#[derive(Debug, Clone)]
pub enum EndiveError {
    /// A proof-script line could not be parsed
    Parse(Box<ErrorDetails>),

    /// Reduction did not reach a fixpoint within the step bound
    NonTermination { steps: usize, term: String },

    /// A handler or hook received the wrong number of arguments
    Arity {
        directive: String,
        expected: String,
        actual: usize,
    },

    /// An imported file could not be read
    Import(String),

    /// A directive would exceed one of the [`crate::ResourceLimits`]
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// Any other integration error
    Engine(String),
}

impl EndiveError {
    /// Create a parse error with source information
    pub fn parse(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: None,
        }))
    }

    /// Create a parse error with suggestion
    pub fn parse_with_suggestion(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: Some(suggestion.into()),
        }))
    }

    /// Place a parse error on `line` of a multi-line source
    pub fn at_line(self, line: usize) -> Self {
        match self {
            EndiveError::Parse(mut details) => {
                details.span.line = line;
                EndiveError::Parse(details)
            }
            other => other,
        }
    }

    /// Terms nested deeper than `max_term_depth`
    pub fn term_too_deep(max_term_depth: usize, depth: usize) -> Self {
        Self::ResourceLimitExceeded {
            limit_name: "max_term_depth".to_string(),
            limit_value: max_term_depth.to_string(),
            actual_value: depth.to_string(),
            suggestion: "Use smaller numerals or flatten nested terms".to_string(),
        }
    }

    pub fn arity(directive: &str, expected: impl Into<String>, actual: usize) -> Self {
        Self::Arity {
            directive: directive.to_string(),
            expected: expected.into(),
            actual,
        }
    }
}

impl fmt::Display for EndiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndiveError::Parse(details) => {
                write!(f, "Parse error: {}", details.message)?;
                if let Some(suggestion) = &details.suggestion {
                    write!(f, " (suggestion: {})", suggestion)?;
                }
                write!(
                    f,
                    " at {}:{}:{}",
                    details.source_id, details.span.line, details.span.col
                )
            }
            EndiveError::NonTermination { steps, term } => write!(
                f,
                "Reduction did not terminate after {} steps, last term: {}",
                steps, term
            ),
            EndiveError::Arity {
                directive,
                expected,
                actual,
            } => write!(
                f,
                "Directive {} expects {} argument(s), got {}",
                directive, expected, actual
            ),
            EndiveError::Import(msg) => write!(f, "Import error: {}", msg),
            EndiveError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                suggestion,
            } => write!(
                f,
                "Resource limit exceeded: {} (limit: {}, actual: {}). {}",
                limit_name, limit_value, actual_value, suggestion
            ),
            EndiveError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for EndiveError {}

impl From<std::fmt::Error> for EndiveError {
    fn from(err: std::fmt::Error) -> Self {
        EndiveError::Engine(format!("Format error: {}", err))
    }
}

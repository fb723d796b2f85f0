use crate::display::render_all;
use crate::object::Object;

/// Result of processing one directive
///
/// A failed outcome is a user-level failure (a rule that does not apply,
/// a goal that is not closed, ...). The state of every helper is left as it
/// was before the directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub results: Vec<Object>,
}

impl Outcome {
    pub fn success(results: Vec<Object>) -> Self {
        Self {
            success: true,
            results,
        }
    }

    pub fn failure(results: Vec<Object>) -> Self {
        Self {
            success: false,
            results,
        }
    }

    /// A failed outcome with a single diagnostic atom
    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(vec![Object::atom("Error").with_result(message)])
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Rendered result templates, joined with `"; "`
    pub fn message(&self) -> String {
        render_all(&self.results)
    }
}

/// Bounds on the work a single directive may do
///
/// The defaults are generous for hand-written proof scripts.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum number of parallel reduction steps before `reduce` gives up
    /// Rule sets are not known to be confluent or terminating, so this is a
    /// policy bound rather than a guarantee.
    pub max_reduction_steps: usize,

    /// Largest integer literal expanded into Peano form
    /// Bigger literals stay plain atoms.
    pub max_numeral: usize,

    /// Maximum nesting of a directive's arguments once numerals and aliases
    /// are expanded. Term traversals recurse, so this bounds stack use.
    pub max_term_depth: usize,

    /// Maximum nesting of `Using` imports
    pub max_import_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_reduction_steps: crate::operations::DEFAULT_MAX_STEPS,
            max_numeral: 200,
            max_term_depth: 256,
            max_import_depth: 32,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_reduction_steps(mut self, steps: usize) -> Self {
        self.max_reduction_steps = steps;
        self
    }
}

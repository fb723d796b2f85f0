//! Engine façade: the helper pipeline, its fixed order and `Using`

use crate::helpers::{AliasHelper, BuildHelper, FunctorialHelper, GoalHelper, PeanoHelper, StateView};
use crate::importer::Imports;
use crate::object::Object;
use crate::parser::parse_line;
use crate::pipeline::Pipeline;
use crate::state::{BuildState, GoalState};
use crate::{EndiveResult, Outcome, ResourceLimits};
use std::path::PathBuf;
use std::rc::Rc;

/// Directive handled by the engine itself rather than by a helper
pub const USING: &str = "Using";

/// The Endive proof engine.
///
/// Owns the helper pipeline in its fixed order (Peano, Alias, Goal, Build,
/// Functorial) and the `Using` importer.
pub struct Engine {
    pipeline: Pipeline,
    goal_state: StateView<GoalState>,
    build_state: StateView<BuildState>,
    limits: ResourceLimits,
    pub(crate) imports: Imports,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_limits(ResourceLimits::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        let peano = PeanoHelper::new(&limits);
        let alias = AliasHelper::new();
        let goal = GoalHelper::new(&limits);
        let goal_state = goal.view();
        let build = BuildHelper::new(&limits, goal_state.clone());
        let build_state = build.view();
        let functorial = FunctorialHelper::new(&limits, build_state.clone());

        let mut pipeline = Pipeline::new().with_max_term_depth(limits.max_term_depth);
        pipeline.register(Box::new(peano));
        pipeline.register(Box::new(alias));
        pipeline.register(Box::new(goal));
        pipeline.register(Box::new(build));
        pipeline.register(Box::new(functorial));

        Self {
            pipeline,
            goal_state,
            build_state,
            limits,
            imports: Imports::default(),
        }
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn helper_names(&self) -> Vec<&'static str> {
        self.pipeline.helper_names()
    }

    /// Run one parsed directive
    pub fn process(&mut self, directive: &str, arguments: Vec<Object>) -> EndiveResult<Outcome> {
        if directive == USING {
            return self.import(&arguments);
        }
        self.pipeline.process(directive, arguments)
    }

    /// Parse and run one line of proof script. Blank and comment lines
    /// succeed with no results.
    pub fn process_line(&mut self, line: &str) -> EndiveResult<Outcome> {
        match parse_line(line)? {
            Some((directive, arguments)) => self.process(&directive, arguments),
            None => Ok(Outcome::success(Vec::new())),
        }
    }

    /// Number of directives [`Engine::undo`] can still revert
    pub fn undo_depth(&self) -> usize {
        self.pipeline.undo_depth()
    }

    /// Undo the most recent state-changing directive, returning its name
    pub fn undo(&mut self) -> Option<String> {
        let undone = self.pipeline.undo()?;
        self.imports.retain_after_rollback(&self.pipeline);
        Some(undone)
    }

    pub fn breakpoint(&mut self, name: &str) {
        self.pipeline.breakpoint(name)
    }

    /// Return to the breakpoint `name`. Files imported after it can be
    /// imported again.
    pub fn rollback(&mut self, name: &str) -> bool {
        if !self.pipeline.rollback(name) {
            return false;
        }
        self.imports.retain_after_rollback(&self.pipeline);
        true
    }

    /// Directory `Using` resolves against outside of an import
    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.imports.base_path = path.into();
    }

    /// Current proof state
    pub fn goal_state(&self) -> Rc<GoalState> {
        self.goal_state.current()
    }

    /// Current forward-chaining state
    pub fn build_state(&self) -> Rc<BuildState> {
        self.build_state.current()
    }
}

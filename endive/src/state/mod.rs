//! Helper states and their transitions
//!
//! Every transition is a pure function from the current snapshot to a
//! [`Step`]. Helpers push the new snapshot on success, so a rejected or
//! failed directive never leaves a half-updated state behind.

pub mod alias;
pub mod build;
pub mod functorial;
pub mod goal;

pub use alias::AliasState;
pub use build::BuildState;
pub use functorial::{FunctorialKey, FunctorialState, Lifting, WrapFailure};
pub use goal::{ActiveGoal, GoalState};

use crate::object::Object;

/// Result of a state transition
#[derive(Debug, Clone)]
pub enum Step<S> {
    /// The directive succeeded and produced a new snapshot
    Next(S, Vec<Object>),
    /// The directive was refused; diagnostics only
    Rejected(Vec<Object>),
}

impl<S> Step<S> {
    pub fn next(state: S, result: Object) -> Self {
        Step::Next(state, vec![result])
    }

    pub fn rejected(diagnostic: Object) -> Self {
        Step::Rejected(vec![diagnostic])
    }

    pub fn is_next(&self) -> bool {
        matches!(self, Step::Next(..))
    }
}

//! Pure structural operations on objects
//!
//! Matching and unification produce an [`Assignment`], substitution consumes
//! one, and composition chains rewritings through unification. Reduction
//! drives composition to a fixpoint under a step bound.

pub mod compose;
pub mod matching;
pub mod substitution;

pub use compose::{compose, compose_rews, reduce, reduce_once, DEFAULT_MAX_STEPS};
pub use matching::{match_left, unify, unify_with, Assignment};
pub use substitution::apply;

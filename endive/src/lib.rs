//! # Endive
//!
//! **An interactive proof kernel built on term rewriting**
//!
//! Statements are terms and rewritings between terms. Proofs are built by
//! composing rewritings, either backwards from a goal or forwards from a
//! starting term, and every step can be undone.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use endive::{Engine, EndiveResult};
//!
//! fn main() -> EndiveResult<()> {
//!     let mut engine = Engine::new();
//!
//!     engine.process_line("Axiom A => B")?;
//!     engine.process_line("Goal A => B")?;
//!     engine.process_line("Intro")?;
//!     engine.process_line("By A => B")?;
//!     let outcome = engine.process_line("Done")?;
//!     assert!(outcome.success);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Objects
//! Terms `f(a, b)`, rewritings `a => b`, compositions `a | b`, holes `[x]`
//! and goals. Objects are immutable and share structure.
//!
//! ### Reduction
//! A composition `a | r` applies the rewriting `r` to `a`; two rewritings
//! under the same symbol chain into one. Reduction repeats this to a
//! fixpoint within a step bound.
//!
//! ### Helpers
//! Directives run through a pipeline of helpers. Each keeps a stack of
//! state snapshots, so directives can be undone and named breakpoints
//! rolled back to.

pub mod buildability;
pub mod context;
pub mod display;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod importer;
pub mod object;
pub mod operations;
pub mod outcome;
pub mod parser;
pub mod pipeline;
pub mod resource_limits;
pub mod state;

pub use buildability::{check, Verdict};
pub use context::{Context, DEFAULT_SYMBOL};
pub use display::{render, render_all};
pub use engine::Engine;
pub use error::EndiveError;
pub use object::{identify, AuxData, GoalData, Object, ObjectKind, RESULT_KEY};
pub use operations::{
    apply, compose, compose_rews, match_left, reduce, reduce_once, unify, Assignment,
};
pub use outcome::Outcome;
pub use parser::{parse_line, parse_line_from, Span};
pub use pipeline::Pipeline;
pub use resource_limits::ResourceLimits;

/// Result type for Endive operations
pub type EndiveResult<T> = Result<T, EndiveError>;

#[cfg(test)]
mod tests;

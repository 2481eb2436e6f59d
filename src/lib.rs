//! # nummeth-rs
//!
//! `nummeth-rs` is the computational core of a numerical-methods service:
//! three independent routines over a user-supplied single-variable formula
//! or linear system.
//!
//! The library provides:
//! - A sandboxed evaluator for textual formulas of one variable `x`
//!   (arithmetic, `^`, and a fixed set of named functions; no scripting
//!   runtime)
//! - Numerical differentiation with forward, backward, and central stencils
//!   of first and second order
//! - An iterative Jacobi solver for linear systems
//! - A Regula-Falsi (false position) root finder
//!
//! Each routine is a pure function: it takes well-formed inputs plus an
//! explicit configuration, and returns a [`NumericalOutcome`] carrying the
//! result, a status message, and (for the iterative solvers) the full
//! iteration trace. Reaching the iteration limit is reported as success
//! with a non-convergence message, never as an error.
//!
//! ## Basic Usage
//!
//! ```
//! use nummeth_rs::{find_root, RegulaFalsiConfig};
//!
//! let outcome = find_root("x^2 - 2", 0.0, 2.0, &RegulaFalsiConfig::default());
//! assert!(outcome.success);
//! ```

// Public modules
pub mod error;

// Expression parsing and evaluation
pub mod expression;

// Solver configuration and defaults
pub mod config;

// Outcome and iteration-trace types
pub mod outcome;

// Numerical routines
pub mod finite_difference;
pub mod jacobi;
pub mod regula_falsi;

// Re-exports for convenience
pub use error::{NumMethError, Result};

pub use config::{FiniteDifferenceConfig, JacobiConfig, RegulaFalsiConfig, MAX_ITERATION_CAP};

pub use expression::{evaluate, Expression};

pub use finite_difference::{differentiate, DiffMode};

pub use jacobi::{check_diagonal_dominance, solve_jacobi};

pub use outcome::{DifferenceResult, IterationRecord, NumericalOutcome, ResultPayload};

pub use regula_falsi::find_root;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

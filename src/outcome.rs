//! Outcome and iteration-trace types shared by all routines.
//!
//! Every top-level routine returns a [`NumericalOutcome`]: a success flag,
//! the result payload, a human-readable status message, and (for the
//! iterative solvers) the iteration count, final error, and full trace. The
//! outcome is built once when the routine completes and never mutated
//! afterwards; the web layer serializes it as-is.

use crate::error::NumMethError;
use serde::Serialize;

/// One derivative estimate from the finite-difference engine.
///
/// `derivative` is `None` when evaluation failed at this point; the failure
/// message is then carried in `error` and the remaining points are
/// unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceResult {
    pub x: f64,
    pub derivative: Option<f64>,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One entry of an iteration trace, appended per completed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IterationRecord {
    /// A Jacobi sweep: 1-based index, full iterate snapshot, infinity-norm
    /// error against the previous iterate.
    Jacobi {
        iteration: usize,
        solution: Vec<f64>,
        error: f64,
    },

    /// A false-position step: 1-based index, current bracket, the computed
    /// intersection point and its function value.
    RegulaFalsi {
        iteration: usize,
        a: f64,
        b: f64,
        c: f64,
        #[serde(rename = "f(c)")]
        f_c: f64,
    },
}

/// The result payload of a routine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultPayload {
    /// A single value, e.g. a root.
    Scalar(f64),

    /// A solution vector.
    Vector(Vec<f64>),

    /// Per-point derivative estimates, in the caller's input order.
    Points(Vec<DifferenceResult>),
}

/// Final result of any routine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericalOutcome {
    pub success: bool,
    pub result: Option<ResultPayload>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_log: Option<Vec<IterationRecord>>,
}

impl NumericalOutcome {
    /// A failed outcome carrying the error's display message.
    pub fn failure(error: NumMethError) -> Self {
        Self {
            success: false,
            result: None,
            message: format!("{}", error),
            iterations: None,
            error: None,
            iteration_log: None,
        }
    }

    /// A successful non-iterative outcome.
    pub fn success(result: ResultPayload, message: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(result),
            message: message.into(),
            iterations: None,
            error: None,
            iteration_log: None,
        }
    }

    /// A successful iterative outcome with its convergence metadata.
    ///
    /// Iteration-limit exhaustion also goes through here: it is reported as
    /// success with a non-convergence message, never as a failure.
    pub fn iterative(
        result: ResultPayload,
        message: impl Into<String>,
        iterations: usize,
        error: f64,
        iteration_log: Vec<IterationRecord>,
    ) -> Self {
        Self {
            success: true,
            result: Some(result),
            message: message.into(),
            iterations: Some(iterations),
            error: Some(error),
            iteration_log: Some(iteration_log),
        }
    }
}

//! Configuration options for the numerical routines.
//!
//! Defaults live here and are resolved by the caller at the boundary; the
//! algorithms never read ambient or global state. Each struct mirrors the
//! defaults the original service shipped in its configuration file.

use crate::error::{NumMethError, Result};

/// Hard ceiling on iteration counts, enforced regardless of caller input.
///
/// Bounds worst-case latency for pathological `max_iterations` values.
pub const MAX_ITERATION_CAP: usize = 10_000;

/// Threshold below which a diagonal entry makes the Jacobi sweep undefined.
pub const DIAGONAL_EPSILON: f64 = 1e-12;

/// Configuration for the finite-difference engine.
#[derive(Debug, Clone)]
pub struct FiniteDifferenceConfig {
    /// Step size used when the caller omits one. Default: 0.01
    pub default_h: f64,

    /// Smallest accepted step size. Default: 1e-10
    pub min_h: f64,

    /// Largest accepted step size. Default: 1.0
    pub max_h: f64,
}

impl Default for FiniteDifferenceConfig {
    fn default() -> Self {
        Self {
            default_h: 0.01,
            min_h: 1e-10,
            max_h: 1.0,
        }
    }
}

impl FiniteDifferenceConfig {
    /// Resolve the caller's optional step size against the allowed window.
    pub fn resolve_step(&self, step: Option<f64>) -> Result<f64> {
        let h = step.unwrap_or(self.default_h);
        if h < self.min_h || h > self.max_h {
            return Err(NumMethError::InvalidStepSize(format!(
                "h = {} must be between {} and {}",
                h, self.min_h, self.max_h
            )));
        }
        Ok(h)
    }
}

/// Configuration for the Jacobi solver.
#[derive(Debug, Clone)]
pub struct JacobiConfig {
    /// Maximum number of sweeps. Default: 100
    pub max_iterations: usize,

    /// Infinity-norm convergence tolerance. Default: 1e-6
    pub tolerance: f64,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl JacobiConfig {
    /// Caller's iteration budget clamped to [`MAX_ITERATION_CAP`].
    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations.min(MAX_ITERATION_CAP)
    }
}

/// Configuration for the Regula-Falsi root finder.
#[derive(Debug, Clone)]
pub struct RegulaFalsiConfig {
    /// Maximum number of iterations. Default: 100
    pub max_iterations: usize,

    /// Convergence tolerance on |f(c)|. Default: 1e-6
    pub tolerance: f64,
}

impl Default for RegulaFalsiConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl RegulaFalsiConfig {
    /// Caller's iteration budget clamped to [`MAX_ITERATION_CAP`].
    pub fn effective_max_iterations(&self) -> usize {
        self.max_iterations.min(MAX_ITERATION_CAP)
    }
}

//! Jacobi iterative method for systems of linear equations.
//!
//! Solves Ax = b by repeated sweeps of
//! `x_new[i] = (b[i] - Σ_{j≠i} A[i][j]·x[j]) / A[i][i]`, using only the
//! previous iterate's values within a sweep (which is what distinguishes
//! Jacobi from Gauss-Seidel). Convergence is measured as the infinity norm
//! of the change between iterates.

use crate::config::{JacobiConfig, DIAGONAL_EPSILON};
use crate::error::{NumMethError, Result};
use crate::outcome::{IterationRecord, NumericalOutcome, ResultPayload};
use log::debug;
use ndarray::{Array1, Array2};

/// Validate the system eagerly, before any iteration runs.
fn validate_system(
    a: &Array2<f64>,
    b: &Array1<f64>,
    x0: Option<&Array1<f64>>,
) -> Result<()> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(NumMethError::DimensionMismatch(format!(
            "matrix A must be square, got {}x{}",
            rows, cols
        )));
    }

    if b.len() != rows {
        return Err(NumMethError::DimensionMismatch(format!(
            "matrix A is {}x{} but vector b has length {}",
            rows, cols,
            b.len()
        )));
    }

    if let Some(x0) = x0 {
        if x0.len() != rows {
            return Err(NumMethError::DimensionMismatch(format!(
                "initial guess has length {}, expected {}",
                x0.len(),
                rows
            )));
        }
    }

    for i in 0..rows {
        if a[[i, i]].abs() <= DIAGONAL_EPSILON {
            return Err(NumMethError::SingularSystem(format!(
                "diagonal entry A[{}][{}] = {} is too close to zero",
                i,
                i,
                a[[i, i]]
            )));
        }
    }

    Ok(())
}

/// Solve Ax = b with the Jacobi method.
///
/// Validation failures (non-square A, dimension mismatch, near-zero
/// diagonal) are reported as failed outcomes before any iteration. Reaching
/// the iteration limit is not a failure: the outcome is successful, carries
/// the best estimate so far, and says so in the message.
pub fn solve_jacobi(
    a: &Array2<f64>,
    b: &Array1<f64>,
    initial_guess: Option<&Array1<f64>>,
    config: &JacobiConfig,
) -> NumericalOutcome {
    if let Err(e) = validate_system(a, b, initial_guess) {
        return NumericalOutcome::failure(e);
    }

    let n = b.len();
    let max_iterations = config.effective_max_iterations();

    let mut x = match initial_guess {
        Some(x0) => x0.clone(),
        None => Array1::zeros(n),
    };

    let mut iteration_log = Vec::new();
    let mut last_error = f64::INFINITY;

    for iteration in 1..=max_iterations {
        let mut x_new = Array1::zeros(n);

        // Every row reads only the previous iterate.
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                if i != j {
                    sum += a[[i, j]] * x[j];
                }
            }
            x_new[i] = (b[i] - sum) / a[[i, i]];
        }

        // A diverging system overflows the iterate; NaN/inf must surface
        // as a failure, never as a result component.
        if x_new.iter().any(|v| !v.is_finite()) {
            debug!("jacobi iterate became non-finite at sweep {}", iteration);
            return NumericalOutcome::failure(NumMethError::EvaluationError(format!(
                "iterate became non-finite at iteration {}; the iteration diverges",
                iteration
            )));
        }

        let error = x_new
            .iter()
            .zip(x.iter())
            .map(|(new, old)| (new - old).abs())
            .fold(0.0_f64, f64::max);

        iteration_log.push(IterationRecord::Jacobi {
            iteration,
            solution: x_new.to_vec(),
            error,
        });

        last_error = error;
        x = x_new;

        if error < config.tolerance {
            debug!("jacobi converged after {} sweeps, error = {:e}", iteration, error);
            return NumericalOutcome::iterative(
                ResultPayload::Vector(x.to_vec()),
                format!("Converged after {} iterations", iteration),
                iteration,
                error,
                iteration_log,
            );
        }
    }

    debug!(
        "jacobi exhausted {} sweeps without converging, error = {:e}",
        max_iterations, last_error
    );
    NumericalOutcome::iterative(
        ResultPayload::Vector(x.to_vec()),
        format!("Did not converge after {} iterations", max_iterations),
        max_iterations,
        last_error,
        iteration_log,
    )
}

/// Check whether A is strictly diagonally dominant.
///
/// Dominance is sufficient (not necessary) for Jacobi convergence; the
/// caller can attach the verdict to its response as a diagnostic.
pub fn check_diagonal_dominance(a: &Array2<f64>) -> (bool, String) {
    let (rows, cols) = a.dim();
    if rows != cols {
        return (false, format!("matrix must be square, got {}x{}", rows, cols));
    }

    for i in 0..rows {
        let diagonal = a[[i, i]].abs();
        let row_sum: f64 = (0..cols).filter(|&j| j != i).map(|j| a[[i, j]].abs()).sum();

        if diagonal <= row_sum {
            return (
                false,
                format!(
                    "row {} fails diagonal dominance: |{}| <= {}",
                    i + 1,
                    a[[i, i]],
                    row_sum
                ),
            );
        }
    }

    (true, "Matrix is strictly diagonally dominant".to_string())
}

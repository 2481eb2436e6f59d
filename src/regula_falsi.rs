//! Regula-Falsi (false position) root finding.
//!
//! Brackets a root of a scalar function between two endpoints of opposite
//! sign and converges on it by repeatedly replacing the endpoint whose
//! function value shares the sign of the new intersection point.

use crate::config::RegulaFalsiConfig;
use crate::error::NumMethError;
use crate::expression::Expression;
use crate::outcome::{IterationRecord, NumericalOutcome, ResultPayload};
use log::debug;

/// Find a root of `expression` in the bracket [a, b].
///
/// Fails with `NoSignChange` when f(a) and f(b) share a sign. When either
/// endpoint already satisfies |f| < tolerance it is returned immediately as
/// the root, with no iteration. Iteration-limit exhaustion is reported as
/// success with the last intersection point as the best estimate.
pub fn find_root(
    expression: &str,
    a: f64,
    b: f64,
    config: &RegulaFalsiConfig,
) -> NumericalOutcome {
    let expr = match Expression::parse(expression) {
        Ok(expr) => expr,
        Err(e) => return NumericalOutcome::failure(e.into()),
    };

    let f = |x: f64| -> crate::error::Result<f64> { Ok(expr.eval(x)?) };

    let (mut a, mut b) = (a, b);
    let mut fa = match f(a) {
        Ok(v) => v,
        Err(e) => return NumericalOutcome::failure(e),
    };
    let mut fb = match f(b) {
        Ok(v) => v,
        Err(e) => return NumericalOutcome::failure(e),
    };

    // The intermediate-value test: no sign change means no guaranteed root.
    if fa * fb > 0.0 {
        return NumericalOutcome::failure(NumMethError::NoSignChange(format!(
            "f({}) = {} and f({}) = {} have the same sign",
            a, fa, b, fb
        )));
    }

    if fa.abs() < config.tolerance {
        return NumericalOutcome::iterative(
            ResultPayload::Scalar(a),
            format!("Endpoint a = {} is already a root", a),
            0,
            fa.abs(),
            Vec::new(),
        );
    }

    if fb.abs() < config.tolerance {
        return NumericalOutcome::iterative(
            ResultPayload::Scalar(b),
            format!("Endpoint b = {} is already a root", b),
            0,
            fb.abs(),
            Vec::new(),
        );
    }

    let max_iterations = config.effective_max_iterations();
    let mut iteration_log = Vec::new();
    let mut c = a;
    let mut fc = fa;

    for iteration in 1..=max_iterations {
        let denominator = fb - fa;
        if denominator == 0.0 {
            return NumericalOutcome::failure(NumMethError::EvaluationError(format!(
                "f(a) = f(b) = {} at iteration {}; false-position step is undefined",
                fa, iteration
            )));
        }

        c = (a * fb - b * fa) / denominator;
        fc = match f(c) {
            Ok(v) => v,
            Err(e) => return NumericalOutcome::failure(e),
        };

        iteration_log.push(IterationRecord::RegulaFalsi {
            iteration,
            a,
            b,
            c,
            f_c: fc,
        });

        if fc.abs() < config.tolerance {
            debug!("regula-falsi converged after {} iterations, |f(c)| = {:e}", iteration, fc.abs());
            return NumericalOutcome::iterative(
                ResultPayload::Scalar(c),
                format!("Converged after {} iterations", iteration),
                iteration,
                fc.abs(),
                iteration_log,
            );
        }

        // Keep the sub-interval across which the sign still changes.
        if fa * fc < 0.0 {
            b = c;
            fb = fc;
        } else {
            a = c;
            fa = fc;
        }
    }

    debug!(
        "regula-falsi exhausted {} iterations, |f(c)| = {:e}",
        max_iterations,
        fc.abs()
    );
    NumericalOutcome::iterative(
        ResultPayload::Scalar(c),
        format!("Did not converge after {} iterations", max_iterations),
        max_iterations,
        fc.abs(),
        iteration_log,
    )
}

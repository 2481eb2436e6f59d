//! Finite difference methods for numerical differentiation.
//!
//! Estimates first and second derivatives of a textual formula at a batch
//! of points using forward, backward, or central stencils. Evaluation goes
//! through the expression module; a failure at one point is recorded on
//! that point alone and the rest of the batch still gets estimates.

use crate::config::FiniteDifferenceConfig;
use crate::error::{NumMethError, Result};
use crate::expression::Expression;
use crate::outcome::{DifferenceResult, NumericalOutcome, ResultPayload};
use log::debug;

/// Stencil direction for the difference quotient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    Forward,
    Backward,
    Central,
}

impl DiffMode {
    fn name(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Central => "central",
        }
    }
}

/// Apply one stencil at a single point.
///
/// Stencils (h = step size):
///
/// | mode     | order 1                   | order 2                              |
/// |----------|---------------------------|--------------------------------------|
/// | forward  | (f(x+h) - f(x)) / h       | (f(x+2h) - 2f(x+h) + f(x)) / h²      |
/// | backward | (f(x) - f(x-h)) / h       | (f(x) - 2f(x-h) + f(x-2h)) / h²      |
/// | central  | (f(x+h) - f(x-h)) / (2h)  | (f(x+h) - 2f(x) + f(x-h)) / h²       |
fn derivative_at(expr: &Expression, x: f64, order: u32, mode: DiffMode, h: f64) -> Result<f64> {
    let f = |x: f64| -> Result<f64> { Ok(expr.eval(x)?) };

    let estimate = match (mode, order) {
        (DiffMode::Forward, 1) => (f(x + h)? - f(x)?) / h,
        (DiffMode::Forward, 2) => (f(x + 2.0 * h)? - 2.0 * f(x + h)? + f(x)?) / (h * h),
        (DiffMode::Backward, 1) => (f(x)? - f(x - h)?) / h,
        (DiffMode::Backward, 2) => (f(x)? - 2.0 * f(x - h)? + f(x - 2.0 * h)?) / (h * h),
        (DiffMode::Central, 1) => (f(x + h)? - f(x - h)?) / (2.0 * h),
        (DiffMode::Central, 2) => (f(x + h)? - 2.0 * f(x)? + f(x - h)?) / (h * h),
        (_, order) => return Err(NumMethError::InvalidOrder(order)),
    };

    if estimate.is_finite() {
        Ok(estimate)
    } else {
        Err(NumMethError::EvaluationError(format!(
            "derivative estimate at x = {} is not finite",
            x
        )))
    }
}

/// Estimate derivatives of `expression` at each point in `points`.
///
/// The output sequence preserves the input order and cardinality: one
/// [`DifferenceResult`] per point, carrying either the estimate or the
/// point's evaluation failure. Order must be 1 or 2; an unparseable formula
/// or an out-of-window step fails the whole batch before any evaluation.
pub fn differentiate(
    expression: &str,
    points: &[f64],
    order: u32,
    mode: DiffMode,
    step: Option<f64>,
    config: &FiniteDifferenceConfig,
) -> NumericalOutcome {
    if order != 1 && order != 2 {
        return NumericalOutcome::failure(NumMethError::InvalidOrder(order));
    }

    let h = match config.resolve_step(step) {
        Ok(h) => h,
        Err(e) => return NumericalOutcome::failure(e),
    };

    let expr = match Expression::parse(expression) {
        Ok(expr) => expr,
        Err(e) => return NumericalOutcome::failure(e.into()),
    };

    let results: Vec<DifferenceResult> = points
        .iter()
        .map(|&x| match derivative_at(&expr, x, order, mode, h) {
            Ok(derivative) => DifferenceResult {
                x,
                derivative: Some(derivative),
                order,
                error: None,
            },
            Err(e) => DifferenceResult {
                x,
                derivative: None,
                order,
                error: Some(format!("{}", e)),
            },
        })
        .collect();

    let failed = results.iter().filter(|r| r.derivative.is_none()).count();
    debug!(
        "{} difference of order {}: {} points, {} failed, h = {}",
        mode.name(),
        order,
        results.len(),
        failed,
        h
    );

    NumericalOutcome::success(
        ResultPayload::Points(results),
        format!(
            "Computed order-{} {} finite differences at {} point(s)",
            order,
            mode.name(),
            points.len()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn estimates(outcome: &NumericalOutcome) -> &[DifferenceResult] {
        match outcome.result.as_ref() {
            Some(ResultPayload::Points(points)) => points,
            other => panic!("Expected Points payload, got {:?}", other),
        }
    }

    #[test]
    fn test_first_order_stencils() {
        let config = FiniteDifferenceConfig::default();

        // f(x) = x^2, f'(2) = 4. Central error is O(h²), one-sided O(h).
        for (mode, tol) in [
            (DiffMode::Central, 1e-3),
            (DiffMode::Forward, 2e-2),
            (DiffMode::Backward, 2e-2),
        ] {
            let outcome = differentiate("x^2", &[2.0], 1, mode, None, &config);
            assert!(outcome.success);

            let points = estimates(&outcome);
            assert_eq!(points.len(), 1);
            assert_relative_eq!(points[0].derivative.unwrap(), 4.0, epsilon = tol);
        }
    }

    #[test]
    fn test_second_order_stencils() {
        let config = FiniteDifferenceConfig::default();

        // f(x) = x^3, f''(2) = 12
        for mode in [DiffMode::Forward, DiffMode::Backward, DiffMode::Central] {
            let outcome = differentiate("x^3", &[2.0], 2, mode, None, &config);
            assert!(outcome.success);

            let points = estimates(&outcome);
            assert_relative_eq!(points[0].derivative.unwrap(), 12.0, epsilon = 0.2);
            assert_eq!(points[0].order, 2);
        }
    }

    #[test]
    fn test_batch_preserves_order_and_cardinality() {
        let config = FiniteDifferenceConfig::default();
        let points = [0.0, 1.0, 2.0, 3.0];

        let outcome = differentiate("sin(x)", &points, 1, DiffMode::Central, None, &config);
        let results = estimates(&outcome);

        assert_eq!(results.len(), points.len());
        for (result, &x) in results.iter().zip(points.iter()) {
            assert_eq!(result.x, x);
            assert_relative_eq!(result.derivative.unwrap(), x.cos(), epsilon = 1e-3);
        }
    }

    #[test]
    fn test_invalid_order_rejected() {
        let config = FiniteDifferenceConfig::default();

        let outcome = differentiate("x^2", &[1.0], 3, DiffMode::Forward, None, &config);
        assert!(!outcome.success);
        assert!(outcome.message.contains("must be 1 or 2"));
    }

    #[test]
    fn test_step_window_rejected_before_evaluation() {
        let config = FiniteDifferenceConfig::default();

        let outcome = differentiate("x^2", &[1.0], 1, DiffMode::Central, Some(10.0), &config);
        assert!(!outcome.success);
        assert!(outcome.message.contains("Invalid step size"));
    }

    #[test]
    fn test_unparseable_formula_fails_batch() {
        let config = FiniteDifferenceConfig::default();

        let outcome = differentiate("x +* 2", &[1.0], 1, DiffMode::Central, None, &config);
        assert!(!outcome.success);
        assert!(outcome.message.contains("Invalid expression"));
    }

    #[test]
    fn test_per_point_failure_isolation() {
        let config = FiniteDifferenceConfig::default();

        // log is undefined at -5, fine at 5; the failure must not abort the
        // batch.
        let outcome = differentiate("log(x)", &[-5.0, 5.0], 1, DiffMode::Central, None, &config);
        assert!(outcome.success);

        let results = estimates(&outcome);
        assert_eq!(results.len(), 2);
        assert!(results[0].derivative.is_none());
        assert!(results[0].error.is_some());
        assert_relative_eq!(results[1].derivative.unwrap(), 1.0 / 5.0, epsilon = 1e-3);
    }
}

use thiserror::Error;

/// Error types for the nummeth-rs library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumMethError {
    /// Error for a formula that cannot be parsed under the supported grammar.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// Error during function evaluation (division by zero, domain error,
    /// or any non-finite intermediate value).
    #[error("Evaluation error: {0}")]
    EvaluationError(String),

    /// Error for a derivative order outside {1, 2}.
    #[error("Invalid derivative order: {0} (must be 1 or 2)")]
    InvalidOrder(u32),

    /// Error for a finite-difference step size outside the allowed window.
    #[error("Invalid step size: {0}")]
    InvalidStepSize(String),

    /// Error indicating a mismatch in matrix/vector dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error indicating a (near-)zero diagonal entry in the Jacobi matrix.
    #[error("Singular system: {0}")]
    SingularSystem(String),

    /// Error for a root-finding interval that does not bracket a root.
    #[error("No sign change: {0}")]
    NoSignChange(String),
}

/// Result type alias for nummeth-rs operations.
pub type Result<T> = std::result::Result<T, NumMethError>;

impl From<crate::expression::ExpressionError> for NumMethError {
    fn from(err: crate::expression::ExpressionError) -> Self {
        use crate::expression::ExpressionError;
        match err {
            ExpressionError::ParseError { .. } => {
                NumMethError::InvalidExpression(format!("{}", err))
            }
            _ => NumMethError::EvaluationError(format!("{}", err)),
        }
    }
}

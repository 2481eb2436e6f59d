//! Parsing and evaluation of single-variable mathematical expressions.
//!
//! Formulas are parsed into a fixed expression tree over one free variable
//! `x` and evaluated directly. The variable is bound at the tree level, so
//! substituting a value for `x` can never corrupt function names such as
//! `exp` or `sqrt`. There is no embedded scripting runtime: the grammar is
//! limited to arithmetic, exponentiation, and a fixed set of unary
//! functions.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::recognize,
    multi::many0,
    number::complete::double,
    sequence::{delimited, pair},
    IResult, Parser,
};
use thiserror::Error;

/// Error that can occur during expression parsing or evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression: {message}")]
    ParseError { message: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("{function}({argument}) is undefined")]
    DomainError { function: &'static str, argument: f64 },

    #[error("Expression produced a non-finite value: {message}")]
    NonFiniteValue { message: String },
}

/// Result type for expression evaluation
type ExprResult<T> = Result<T, ExpressionError>;

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant number
    Number(f64),

    /// The free variable `x`
    Variable,

    /// Unary operations
    Unary(UnaryOp, Box<Expression>),

    /// Binary operations
    Binary(BinaryOp, Box<Expression>, Box<Expression>),

    /// Named unary function applied to a parenthesized argument
    Function(MathFunction, Box<Expression>),
}

/// Unary operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
}

/// Binary operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    /// Addition (+)
    Add,

    /// Subtraction (-)
    Sub,

    /// Multiplication (*)
    Mul,

    /// Division (/)
    Div,

    /// Power (^)
    Pow,
}

/// The named functions of the grammar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathFunction {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Abs,
}

impl MathFunction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sqrt" => Some(Self::Sqrt),
            "sin" => Some(Self::Sin),
            "cos" => Some(Self::Cos),
            "tan" => Some(Self::Tan),
            "exp" => Some(Self::Exp),
            "log" => Some(Self::Log),
            "abs" => Some(Self::Abs),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Abs => "abs",
        }
    }

    fn apply(&self, arg: f64) -> ExprResult<f64> {
        let value = match self {
            Self::Sqrt => arg.sqrt(),
            Self::Sin => arg.sin(),
            Self::Cos => arg.cos(),
            Self::Tan => arg.tan(),
            Self::Exp => arg.exp(),
            Self::Log => arg.ln(),
            Self::Abs => arg.abs(),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExpressionError::DomainError {
                function: self.name(),
                argument: arg,
            })
        }
    }
}

impl Expression {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> ExprResult<Self> {
        match expr_parser(input.trim()) {
            Ok((remainder, expr)) => {
                // Make sure the entire input was consumed
                if remainder.trim().is_empty() {
                    Ok(expr)
                } else {
                    Err(ExpressionError::ParseError {
                        message: format!("Unexpected trailing characters: '{}'", remainder),
                    })
                }
            }
            Err(e) => Err(ExpressionError::ParseError {
                message: format!("{:?}", e),
            }),
        }
    }

    /// Evaluate the expression with the given value bound to `x`
    pub fn eval(&self, x: f64) -> ExprResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),

            Self::Variable => Ok(x),

            Self::Unary(op, expr) => {
                let value = expr.eval(x)?;
                match op {
                    UnaryOp::Neg => Ok(-value),
                }
            }

            Self::Binary(op, left, right) => {
                let lhs = left.eval(x)?;
                let rhs = right.eval(x)?;

                let value = match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Sub => lhs - rhs,
                    BinaryOp::Mul => lhs * rhs,
                    BinaryOp::Div => {
                        if rhs == 0.0 {
                            return Err(ExpressionError::DivisionByZero);
                        }
                        lhs / rhs
                    }
                    BinaryOp::Pow => lhs.powf(rhs),
                };

                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ExpressionError::NonFiniteValue {
                        message: format!("{} {:?} {}", lhs, op, rhs),
                    })
                }
            }

            Self::Function(func, arg) => {
                let value = arg.eval(x)?;
                func.apply(value)
            }
        }
    }
}

/// Parse a formula and evaluate it at `x` in one call.
///
/// This is the evaluator contract used by the finite-difference engine and
/// the root finder: the formula is reparsed per call and no state survives
/// between invocations.
pub fn evaluate(expression: &str, x: f64) -> crate::error::Result<f64> {
    let expr = Expression::parse(expression)?;
    Ok(expr.eval(x)?)
}

// Parser functions using nom

/// Parse an identifier (variable, constant, or function name)
fn identifier(input: &str) -> IResult<&str, &str> {
    let mut parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));

    parser.parse(input)
}

/// Parse a number
fn number(input: &str) -> IResult<&str, Expression> {
    // Reject identifier-like starts so `double` never swallows the leading
    // "e" of `exp` or nom's "inf"/"nan" spellings.
    if input
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
    {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        )));
    }

    let (input, num) = double(input)?;
    Ok((input, Expression::Number(num)))
}

/// Parse a named symbol: the variable `x`, a constant, or a function call
fn symbol(input: &str) -> IResult<&str, Expression> {
    let (rest, name) = identifier(input)?;

    // A function name must be followed by a parenthesized argument.
    if let Some(func) = MathFunction::from_name(name) {
        let (rest, arg) = delimited(
            pair(multispace0, char('(')),
            expr_parser,
            pair(multispace0, char(')')),
        )
        .parse(rest)?;
        return Ok((rest, Expression::Function(func, Box::new(arg))));
    }

    match name {
        "x" => Ok((rest, Expression::Variable)),
        "pi" => Ok((rest, Expression::Number(std::f64::consts::PI))),
        "e" => Ok((rest, Expression::Number(std::f64::consts::E))),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

/// Parse a parenthesized expression
fn parens(input: &str) -> IResult<&str, Expression> {
    delimited(
        char('('),
        expr_parser,
        pair(multispace0, char(')')),
    )
    .parse(input)
}

/// Parse a primary expression (number, symbol, or parenthesized expression)
fn primary(input: &str) -> IResult<&str, Expression> {
    let (input, _) = multispace0.parse(input)?;
    alt((number, symbol, parens)).parse(input)
}

/// Parse a power expression (right-associative, binds tighter than unary minus)
fn power(input: &str) -> IResult<&str, Expression> {
    let (input, left) = primary(input)?;
    let (after_space, _) = multispace0.parse(input)?;

    match char::<_, nom::error::Error<_>>('^').parse(after_space) {
        Ok((after_op, _)) => {
            // The exponent may itself carry a unary minus, e.g. 2^-3.
            let (remaining, right) = unary(after_op)?;
            Ok((
                remaining,
                Expression::Binary(BinaryOp::Pow, Box::new(left), Box::new(right)),
            ))
        }
        Err(_) => Ok((input, left)),
    }
}

/// Parse a unary expression (-expr)
fn unary(input: &str) -> IResult<&str, Expression> {
    let (input, _) = multispace0.parse(input)?;

    match char::<_, nom::error::Error<_>>('-').parse(input) {
        Ok((after_minus, _)) => {
            let (remaining, expr) = unary(after_minus)?;
            Ok((remaining, Expression::Unary(UnaryOp::Neg, Box::new(expr))))
        }
        Err(_) => power(input),
    }
}

/// Parse a multiplicative expression (left-associative * and /)
fn term(input: &str) -> IResult<&str, Expression> {
    let (mut input, mut left) = unary(input)?;

    loop {
        let (after_space, _) = multispace0::<_, nom::error::Error<_>>.parse(input)?;
        let op = match alt((char('*'), char('/'))).parse(after_space) {
            Ok((after_op, '*')) => (after_op, BinaryOp::Mul),
            Ok((after_op, _)) => (after_op, BinaryOp::Div),
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        };

        let (remaining, right) = unary(op.0)?;
        left = Expression::Binary(op.1, Box::new(left), Box::new(right));
        input = remaining;
    }

    Ok((input, left))
}

/// Parse an additive expression (left-associative + and -)
fn expr_parser(input: &str) -> IResult<&str, Expression> {
    let (mut input, mut left) = term(input)?;

    loop {
        let (after_space, _) = multispace0::<_, nom::error::Error<_>>.parse(input)?;
        let op = match alt((char('+'), char('-'))).parse(after_space) {
            Ok((after_op, '+')) => (after_op, BinaryOp::Add),
            Ok((after_op, _)) => (after_op, BinaryOp::Sub),
            Err(nom::Err::Error(_)) => break,
            Err(e) => return Err(e),
        };

        let (remaining, right) = term(op.0)?;
        left = Expression::Binary(op.1, Box::new(left), Box::new(right));
        input = remaining;
    }

    Ok((input, left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_number() {
        assert_eq!(Expression::parse("42").unwrap(), Expression::Number(42.0));

        assert_eq!(Expression::parse("3.14").unwrap(), Expression::Number(3.14));

        assert_eq!(
            Expression::parse("-2.5").unwrap(),
            Expression::Unary(UnaryOp::Neg, Box::new(Expression::Number(2.5)))
        );
    }

    #[test]
    fn test_parse_variable_and_constants() {
        assert_eq!(Expression::parse("x").unwrap(), Expression::Variable);

        assert_eq!(
            Expression::parse("pi").unwrap(),
            Expression::Number(std::f64::consts::PI)
        );

        assert_eq!(
            Expression::parse("e").unwrap(),
            Expression::Number(std::f64::consts::E)
        );

        // Any other identifier is outside the grammar
        assert!(Expression::parse("y").is_err());
        assert!(Expression::parse("x + y").is_err());
    }

    #[test]
    fn test_parse_binary_ops() {
        assert_eq!(
            Expression::parse("1 + 2").unwrap(),
            Expression::Binary(
                BinaryOp::Add,
                Box::new(Expression::Number(1.0)),
                Box::new(Expression::Number(2.0))
            )
        );

        assert_eq!(
            Expression::parse("2 ^ 3").unwrap(),
            Expression::Binary(
                BinaryOp::Pow,
                Box::new(Expression::Number(2.0)),
                Box::new(Expression::Number(3.0))
            )
        );
    }

    #[test]
    fn test_associativity() {
        // Subtraction and division are left-associative
        assert_relative_eq!(evaluate("1 - 2 + 3", 0.0).unwrap(), 2.0);
        assert_relative_eq!(evaluate("8 / 4 / 2", 0.0).unwrap(), 1.0);

        // Power is right-associative: 2^(3^2) = 512, not (2^3)^2 = 64
        assert_relative_eq!(evaluate("2 ^ 3 ^ 2", 0.0).unwrap(), 512.0);
    }

    #[test]
    fn test_precedence() {
        assert_relative_eq!(evaluate("1 + 2 * 3", 0.0).unwrap(), 7.0);
        assert_relative_eq!(evaluate("2 * 3 ^ 2", 0.0).unwrap(), 18.0);
        assert_relative_eq!(evaluate("-x ^ 2", 3.0).unwrap(), -9.0);
        assert_relative_eq!(evaluate("2 ^ -1", 0.0).unwrap(), 0.5);
        assert_relative_eq!(evaluate("2 * (x + 1) / (4 - x)", 2.0).unwrap(), 3.0);
    }

    #[test]
    fn test_variable_is_a_token_not_a_substring() {
        // The "x" inside exp must never be treated as the variable.
        assert_relative_eq!(
            evaluate("exp(x)", 1.0).unwrap(),
            std::f64::consts::E,
            epsilon = 1e-12
        );

        assert_relative_eq!(evaluate("exp(x) * x", 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_functions() {
        assert_relative_eq!(evaluate("sqrt(x)", 9.0).unwrap(), 3.0);
        assert_relative_eq!(evaluate("sin(x)", 0.5).unwrap(), 0.5_f64.sin());
        assert_relative_eq!(evaluate("cos(0)", 0.0).unwrap(), 1.0);
        assert_relative_eq!(evaluate("tan(x)", 0.25).unwrap(), 0.25_f64.tan());
        assert_relative_eq!(evaluate("log(e)", 0.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(evaluate("abs(x)", -4.0).unwrap(), 4.0);
    }

    #[test]
    fn test_evaluation_errors() {
        // Division by zero
        match Expression::parse("1 / (x - 1)").unwrap().eval(1.0) {
            Err(ExpressionError::DivisionByZero) => {}
            other => panic!("Expected DivisionByZero, got {:?}", other),
        }

        // Domain errors in log and sqrt
        match Expression::parse("log(x)").unwrap().eval(-1.0) {
            Err(ExpressionError::DomainError { function, .. }) => assert_eq!(function, "log"),
            other => panic!("Expected DomainError, got {:?}", other),
        }

        match Expression::parse("sqrt(x)").unwrap().eval(-4.0) {
            Err(ExpressionError::DomainError { function, .. }) => assert_eq!(function, "sqrt"),
            other => panic!("Expected DomainError, got {:?}", other),
        }

        // Overflow to infinity is caught
        match Expression::parse("10 ^ x").unwrap().eval(1000.0) {
            Err(ExpressionError::NonFiniteValue { .. }) => {}
            other => panic!("Expected NonFiniteValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(Expression::parse("").is_err());
        assert!(Expression::parse("1 +").is_err());
        assert!(Expression::parse("(x + 1").is_err());
        assert!(Expression::parse("foo(x)").is_err());
        assert!(Expression::parse("sin x").is_err());
        assert!(Expression::parse("1 2").is_err());
    }

    #[test]
    fn test_unknown_function_is_parse_error() {
        match crate::expression::evaluate("sinh(x)", 1.0) {
            Err(crate::error::NumMethError::InvalidExpression(_)) => {}
            other => panic!("Expected InvalidExpression, got {:?}", other),
        }
    }
}

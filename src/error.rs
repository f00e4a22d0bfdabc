use miette::Diagnostic;
use thiserror::Error;

use crate::parse::Op;

/// Every failure the engine reports. The `Display` text is one of four fixed
/// messages; the concrete cause travels in the diagnostic help.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Invalid expression")]
    #[diagnostic(code(calc::invalid_expression), help("{reason}"))]
    InvalidExpression { reason: Malformed },

    #[error("Invalid identifier")]
    #[diagnostic(
        code(calc::invalid_identifier),
        help("identifiers are latin letters only, got `{name}`")
    )]
    InvalidIdentifier { name: String },

    #[error("Invalid assignment")]
    #[diagnostic(
        code(calc::invalid_assignment),
        help("assign a number or a variable: `name = value`, got `{line}`")
    )]
    InvalidAssignment { line: String },

    #[error("Unknown variable")]
    #[diagnostic(
        code(calc::unknown_variable),
        help("assign `{name}` before using it")
    )]
    UnknownVariable { name: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("`)` has no matching `(`")]
    UnmatchedRightParen,
    #[error("`(` is never closed")]
    UnclosedLeftParen,
    #[error("operator `{0}` is missing an operand")]
    MissingOperand(Op),
    #[error("division by zero")]
    DivisionByZero,
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),
    #[error("`{0}` is neither a number nor an identifier")]
    UnknownToken(String),
    #[error("nothing to evaluate")]
    Empty,
    #[error("{0} values are left without an operator")]
    LeftoverOperands(usize),
    #[error("`{0}` has no inverse modulo 10")]
    NotInvertible(String),
    #[error("negative exponent `{0}`")]
    NegativeExponent(String),
    #[error("exponent `{0}` is too large")]
    ExponentTooLarge(String),
}

impl From<Malformed> for EvalError {
    fn from(reason: Malformed) -> Self {
        EvalError::InvalidExpression { reason }
    }
}

impl EvalError {
    pub fn unknown_variable(name: &str) -> Self {
        EvalError::UnknownVariable {
            name: name.to_string(),
        }
    }

    pub fn invalid_identifier(name: &str) -> Self {
        EvalError::InvalidIdentifier {
            name: name.to_string(),
        }
    }
}

//! Line-at-a-time integer calculator.
//!
//! A line is normalized, classified as an assignment, a bare number, a
//! variable lookup or an expression, and expressions go through a
//! shunting-yard parser into a postfix sequence evaluated over [`BigInt`].
//!
//! ```
//! use calc_interpreter::{Environment, Outcome, evaluate};
//! use num_bigint::BigInt;
//!
//! let mut env = Environment::new();
//! evaluate("a = 5", &mut env).unwrap();
//! assert_eq!(evaluate("a + -- 1", &mut env), Ok(Outcome::Value(BigInt::from(6))));
//! ```
//!
//! [`BigInt`]: num_bigint::BigInt

pub mod classify;
pub mod error;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod system;

pub use error::{EvalError, Malformed};
pub use eval::{Config, Environment, Interpreter, Outcome, PowerMode, evaluate, evaluate_with};
pub use lex::{Lexer, normalize};
pub use parse::{Parser, Postfix};

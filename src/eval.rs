use std::{collections::HashMap, fmt::Display};

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{
    Parser,
    classify::{Line, Rhs},
    error::{EvalError, Malformed},
    lex::normalize,
    parse::{Atom, Item, Op, Postfix},
};

/// Variables that outlive a single line.
///
/// Evaluation takes `&mut Environment`; callers sharing one environment
/// across threads have to wrap it in a lock themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    values: HashMap<String, BigInt>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&BigInt> {
        self.values.get(name)
    }

    pub fn define(&mut self, name: impl Into<String>, value: BigInt) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How `^` is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PowerMode {
    /// `base ^ exponent mod 10`, the historical behaviour.
    #[default]
    Modular,
    /// Plain integer exponentiation.
    Exact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub power: PowerMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Value(BigInt),
    Assigned { name: String, value: BigInt },
    Blank,
}

impl Outcome {
    /// Text to show the user, if any. Assignments and blank lines are silent.
    pub fn output(&self) -> Option<String> {
        match self {
            Outcome::Value(value) => Some(value.to_string()),
            Outcome::Assigned { .. } | Outcome::Blank => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Value(value) => write!(f, "{value}"),
            Outcome::Assigned { name, value } => write!(f, "{name} = {value}"),
            Outcome::Blank => Ok(()),
        }
    }
}

/// Evaluates one raw input line with the default configuration.
pub fn evaluate(input: &str, env: &mut Environment) -> Result<Outcome, EvalError> {
    evaluate_with(input, env, &Config::default())
}

pub fn evaluate_with(
    input: &str,
    env: &mut Environment,
    config: &Config,
) -> Result<Outcome, EvalError> {
    let normalized = normalize(input);
    tracing::debug!(input, %normalized, "normalized line");

    match Line::classify(&normalized)? {
        Line::Blank => Ok(Outcome::Blank),
        Line::Number(n) => Ok(Outcome::Value(n)),
        Line::Lookup(name) => env
            .get(name)
            .cloned()
            .map(Outcome::Value)
            .ok_or_else(|| EvalError::unknown_variable(name)),
        Line::Assignment { name, value } => {
            let value = match value {
                Rhs::Number(n) => n,
                Rhs::Variable(source) => env
                    .get(source)
                    .cloned()
                    .ok_or_else(|| EvalError::unknown_variable(source))?,
            };
            tracing::debug!(name, %value, "assigned");
            env.define(name, value.clone());
            Ok(Outcome::Assigned {
                name: name.to_string(),
                value,
            })
        }
        Line::Expression(expression) => {
            let postfix = Parser::new(expression).to_postfix()?;
            postfix.evaluate(env, config.power).map(Outcome::Value)
        }
    }
}

impl Postfix<'_> {
    pub fn evaluate(&self, env: &Environment, power: PowerMode) -> Result<BigInt, EvalError> {
        let mut stack: Vec<BigInt> = Vec::with_capacity(self.items.len());

        for item in &self.items {
            match item {
                Item::Atom(Atom::Number(n)) => stack.push(n.clone()),
                Item::Atom(Atom::Ident(name)) => {
                    let value = env
                        .get(name)
                        .ok_or_else(|| EvalError::unknown_variable(name))?;
                    stack.push(value.clone());
                }
                Item::Op(op) => {
                    let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                        return Err(Malformed::MissingOperand(*op).into());
                    };
                    let result = apply(*op, lhs, rhs, power)?;
                    tracing::trace!(%op, %result, depth = stack.len(), "applied");
                    stack.push(result);
                }
            }
        }

        match (stack.pop(), stack.len()) {
            (Some(result), 0) => Ok(result),
            (None, _) => Err(Malformed::Empty.into()),
            (Some(_), left) => Err(Malformed::LeftoverOperands(left + 1).into()),
        }
    }
}

fn apply(op: Op, lhs: BigInt, rhs: BigInt, power: PowerMode) -> Result<BigInt, Malformed> {
    Ok(match op {
        Op::Plus => lhs + rhs,
        Op::Minus => lhs - rhs,
        Op::Star => lhs * rhs,
        Op::Slash => {
            if rhs.is_zero() {
                return Err(Malformed::DivisionByZero);
            }
            // BigInt division truncates toward zero.
            lhs / rhs
        }
        Op::Caret => match power {
            PowerMode::Modular => modular_power(&lhs, &rhs)?,
            PowerMode::Exact => exact_power(&lhs, &rhs)?,
        },
    })
}

const POWER_MODULUS: u32 = 10;

/// `base ^ exponent mod 10`, always in `0..10`. A negative exponent raises the
/// inverse of `base` instead.
fn modular_power(base: &BigInt, exponent: &BigInt) -> Result<BigInt, Malformed> {
    let modulus = BigInt::from(POWER_MODULUS);
    if !exponent.is_negative() {
        return Ok(base.modpow(exponent, &modulus));
    }

    let residue = ((base % &modulus) + &modulus) % &modulus;
    let inverse = (1..POWER_MODULUS)
        .map(BigInt::from)
        .find(|candidate| (&residue * candidate) % &modulus == BigInt::from(1))
        .ok_or_else(|| Malformed::NotInvertible(base.to_string()))?;
    Ok(inverse.modpow(&-exponent, &modulus))
}

/// Upper bound on the size of an exact power, in bits.
const MAX_POWER_BITS: u64 = 1 << 20;

/// Plain `base ^ exponent`. Results wider than [`MAX_POWER_BITS`] are refused
/// before any work is done; 0, 1 and -1 never grow.
fn exact_power(base: &BigInt, exponent: &BigInt) -> Result<BigInt, Malformed> {
    if exponent.is_negative() {
        return Err(Malformed::NegativeExponent(exponent.to_string()));
    }
    let too_large = || Malformed::ExponentTooLarge(exponent.to_string());
    if base.is_zero() || base.magnitude().is_one() {
        return Ok(if base.is_negative() && !(exponent % 2u32).is_zero() {
            -BigInt::one()
        } else if base.is_zero() && !exponent.is_zero() {
            BigInt::zero()
        } else {
            BigInt::one()
        });
    }

    let exponent = exponent.to_u32().ok_or_else(too_large)?;
    // `bits * exponent` bounds the width of the result from above.
    if base.bits().saturating_mul(u64::from(exponent)) > MAX_POWER_BITS {
        return Err(too_large());
    }
    Ok(base.pow(exponent))
}

/// Owns an environment and evaluates lines against it, one at a time.
#[derive(Debug, Default)]
pub struct Interpreter {
    environment: Environment,
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Self {
            environment: Environment::new(),
            config,
        }
    }

    pub fn evaluate(&mut self, line: &str) -> Result<Outcome, EvalError> {
        evaluate_with(line, &mut self.environment, &self.config)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}

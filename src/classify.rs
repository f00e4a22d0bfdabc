use num_bigint::BigInt;

use crate::{error::EvalError, lex::trim_ascii};

/// Shape of a normalized input line, decided before any tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'de> {
    Blank,
    Assignment { name: &'de str, value: Rhs<'de> },
    Number(BigInt),
    Lookup(&'de str),
    Expression(&'de str),
}

/// Right-hand side of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rhs<'de> {
    Number(BigInt),
    /// Looked up verbatim, sign included.
    Variable(&'de str),
}

pub fn is_identifier(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_signed_integer(word: &str) -> bool {
    let digits = word.strip_prefix(['+', '-']).unwrap_or(word);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_bare_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl<'de> Line<'de> {
    /// Classifies `line`, which must already be normalized. The first matching
    /// shape wins: assignment, bare number, bare word, expression.
    pub fn classify(line: &'de str) -> Result<Line<'de>, EvalError> {
        let line = trim_ascii(line);
        let classified = if line.is_empty() {
            Line::Blank
        } else if let Some((name, value)) = line.split_once('=') {
            Self::assignment(line, trim_ascii(name), trim_ascii(value))?
        } else if is_signed_integer(line) {
            match line.parse() {
                Ok(n) => Line::Number(n),
                Err(_) => Line::Expression(line),
            }
        } else if is_bare_word(line) {
            if !is_identifier(line) {
                return Err(EvalError::invalid_identifier(line));
            }
            Line::Lookup(line)
        } else {
            Line::Expression(line)
        };

        tracing::debug!(?classified, "classified line");
        Ok(classified)
    }

    fn assignment(line: &str, name: &'de str, value: &'de str) -> Result<Line<'de>, EvalError> {
        if !is_identifier(name) {
            return Err(EvalError::invalid_identifier(name));
        }

        let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
        let unsigned = trim_ascii(unsigned);
        let shaped = is_identifier(unsigned)
            || (!unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()));
        if !shaped {
            return Err(EvalError::InvalidAssignment {
                line: line.to_string(),
            });
        }

        let value = match value.parse() {
            Ok(n) => Rhs::Number(n),
            Err(_) => Rhs::Variable(value),
        };
        Ok(Line::Assignment { name, value })
    }
}

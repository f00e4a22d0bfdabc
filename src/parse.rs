use std::fmt::Display;

use num_bigint::BigInt;

use crate::{
    Lexer,
    error::{EvalError, Malformed},
    lex::{Token, TokenKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Minus,
    Plus,
    Star,
    Slash,
    Caret,
}

impl Op {
    /// Higher binds tighter. Every operator is binary and left-associative,
    /// `^` included.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Plus | Op::Minus => 2,
            Op::Star | Op::Slash => 10,
            Op::Caret => 11,
        }
    }

    fn from_kind(kind: &TokenKind) -> Option<Op> {
        Some(match kind {
            TokenKind::Minus => Op::Minus,
            TokenKind::Plus => Op::Plus,
            TokenKind::Star => Op::Star,
            TokenKind::Slash => Op::Slash,
            TokenKind::Caret => Op::Caret,
            _ => return None,
        })
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Op::Minus => '-',
            Op::Plus => '+',
            Op::Star => '*',
            Op::Slash => '/',
            Op::Caret => '^',
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom<'de> {
    Number(BigInt),
    Ident(&'de str),
}

/// One element of a postfix sequence. A parenthesis has no representation
/// here, so a finished [`Postfix`] cannot hold one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'de> {
    Atom(Atom<'de>),
    Op(Op),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Postfix<'de> {
    pub items: Vec<Item<'de>>,
}

impl Display for Postfix<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match item {
                Item::Atom(Atom::Number(n)) => write!(f, "{n}")?,
                Item::Atom(Atom::Ident(name)) => write!(f, "{name}")?,
                Item::Op(op) => write!(f, "{op}")?,
            }
        }
        Ok(())
    }
}

/// Entries of the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    LeftParen,
    Op(Op),
}

/// Shunting-yard conversion of an infix token stream into postfix order.
pub struct Parser<'de> {
    lexer: Lexer<'de>,
    operators: Vec<Pending>,
    output: Vec<Item<'de>>,
}

impl<'de> Parser<'de> {
    /// `whole` must already be normalized.
    pub fn new(whole: &'de str) -> Self {
        Parser {
            lexer: Lexer::new(whole),
            operators: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn to_postfix(mut self) -> Result<Postfix<'de>, EvalError> {
        while let Some(token) = self.lexer.next() {
            self.push_token(token)?;
        }

        while let Some(pending) = self.operators.pop() {
            match pending {
                Pending::Op(op) => self.output.push(Item::Op(op)),
                Pending::LeftParen => return Err(Malformed::UnclosedLeftParen.into()),
            }
        }

        let postfix = Postfix { items: self.output };
        tracing::debug!(%postfix, "converted to postfix");
        Ok(postfix)
    }

    fn push_token(&mut self, token: Token<'de>) -> Result<(), EvalError> {
        match token.kind {
            TokenKind::Number(n) => self.output.push(Item::Atom(Atom::Number(n))),
            TokenKind::Ident => self.output.push(Item::Atom(Atom::Ident(token.literal))),
            TokenKind::LeftParen => self.operators.push(Pending::LeftParen),
            TokenKind::RightParen => self.close_paren()?,
            TokenKind::Equal => {
                return Err(Malformed::UnknownOperator(token.literal.to_string()).into());
            }
            TokenKind::Unknown => {
                return Err(Malformed::UnknownToken(token.literal.to_string()).into());
            }
            ref kind => {
                let Some(op) = Op::from_kind(kind) else {
                    return Err(Malformed::UnknownOperator(token.literal.to_string()).into());
                };
                self.push_operator(op);
            }
        }
        Ok(())
    }

    fn close_paren(&mut self) -> Result<(), EvalError> {
        loop {
            match self.operators.pop() {
                Some(Pending::Op(op)) => self.output.push(Item::Op(op)),
                Some(Pending::LeftParen) => return Ok(()),
                None => return Err(Malformed::UnmatchedRightParen.into()),
            }
        }
    }

    fn push_operator(&mut self, op: Op) {
        let top = match self.operators.last() {
            None | Some(Pending::LeftParen) => {
                self.operators.push(Pending::Op(op));
                return;
            }
            Some(Pending::Op(top)) => *top,
        };

        if op.precedence() > top.precedence() {
            self.operators.push(Pending::Op(op));
            return;
        }

        while let Some(&Pending::Op(top)) = self.operators.last() {
            if top.precedence() < op.precedence() {
                break;
            }
            self.operators.pop();
            self.output.push(Item::Op(top));
        }
        self.operators.push(Pending::Op(op));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postfix(input: &str) -> Result<String, EvalError> {
        Parser::new(input).to_postfix().map(|p| p.to_string())
    }

    #[test]
    fn respects_precedence() {
        assert_eq!(postfix("2+3*4").unwrap(), "2 3 4 * +");
        assert_eq!(postfix("2*3+4").unwrap(), "2 3 * 4 +");
        assert_eq!(postfix("(2+3)*4").unwrap(), "2 3 + 4 *");
    }

    #[test]
    fn equal_precedence_binds_left_to_right() {
        assert_eq!(postfix("8-3-2").unwrap(), "8 3 - 2 -");
        assert_eq!(postfix("8/4*2").unwrap(), "8 4 / 2 *");
        assert_eq!(postfix("2^3^2").unwrap(), "2 3 ^ 2 ^");
    }

    #[test]
    fn pops_down_to_the_nearest_paren() {
        assert_eq!(postfix("a*(b+c^d)-e").unwrap(), "a b c d ^ + * e -");
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert_eq!(
            postfix("(1+2"),
            Err(Malformed::UnclosedLeftParen.into())
        );
        assert_eq!(
            postfix("1+2)"),
            Err(Malformed::UnmatchedRightParen.into())
        );
    }

    #[test]
    fn rejects_unknown_operators_and_tokens() {
        assert_eq!(
            postfix("a=1"),
            Err(Malformed::UnknownOperator("=".into()).into())
        );
        assert_eq!(
            postfix("a1+2"),
            Err(Malformed::UnknownToken("a1".into()).into())
        );
    }

    #[test]
    fn postfix_never_holds_parens() {
        let parsed = Parser::new("((1))+(2*(3))").to_postfix().unwrap();
        assert_eq!(parsed.to_string(), "1 2 3 * +");
    }
}

use std::fmt::Display;

use num_bigint::BigInt;

/// Characters that end a token. Each of them is a token on its own.
const BOUNDARIES: [char; 8] = ['^', ')', '(', '=', '*', '/', '+', '-'];

fn is_boundary(c: char) -> bool {
    BOUNDARIES.contains(&c)
}

/// Strips ASCII whitespace only; other Unicode spaces are ordinary text.
pub fn trim_ascii(input: &str) -> &str {
    input.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Canonical form of a raw input line.
///
/// The line is trimmed, whitespace touching a boundary character is dropped
/// and every run of `+`/`-` collapses to a single sign: `-` when the run holds
/// an odd number of minuses, `+` otherwise. Whitespace between two signs
/// touches both, so `- -` is a run of two.
///
/// Running it twice yields the same string as running it once.
pub fn normalize(input: &str) -> String {
    let input = trim_ascii(input);
    let mut normalized = String::with_capacity(input.len());

    // Parity of the pending sign run: `Some(true)` means an odd number of `-`.
    let mut run: Option<bool> = None;
    let mut gap: Option<usize> = None;
    let mut after_boundary = false;

    for (i, c) in input.char_indices() {
        if c.is_ascii_whitespace() {
            gap.get_or_insert(i);
            continue;
        }
        let boundary = is_boundary(c);
        if let Some(start) = gap.take() {
            if !boundary && !after_boundary {
                normalized.push_str(&input[start..i]);
            }
        }

        match c {
            '+' | '-' => run = Some(run.unwrap_or(false) ^ (c == '-')),
            _ => {
                if let Some(negative) = run.take() {
                    normalized.push(if negative { '-' } else { '+' });
                }
                normalized.push(c);
            }
        }
        after_boundary = boundary;
    }
    if let Some(negative) = run {
        normalized.push(if negative { '-' } else { '+' });
    }

    normalized
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Minus,
    Plus,
    Star,
    Slash,
    Caret,
    Equal,
    Ident,
    Number(BigInt),
    Unknown,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match &self.kind {
            TokenKind::LeftParen => write!(f, "LEFT_PAREN {lit}"),
            TokenKind::RightParen => write!(f, "RIGHT_PAREN {lit}"),
            TokenKind::Minus => write!(f, "MINUS {lit}"),
            TokenKind::Plus => write!(f, "PLUS {lit}"),
            TokenKind::Star => write!(f, "STAR {lit}"),
            TokenKind::Slash => write!(f, "SLASH {lit}"),
            TokenKind::Caret => write!(f, "CARET {lit}"),
            TokenKind::Equal => write!(f, "EQUAL {lit}"),
            TokenKind::Ident => write!(f, "IDENTIFIER {lit}"),
            TokenKind::Number(n) => write!(f, "NUMBER {lit} {n}"),
            TokenKind::Unknown => write!(f, "UNKNOWN {lit}"),
        }
    }
}

/// Splits a normalized line at every boundary character.
///
/// The lexer never fails: text it cannot classify comes out as
/// [`TokenKind::Unknown`] and is rejected by the parser. Concatenating the
/// literals of all tokens gives back the input.
pub struct Lexer<'de> {
    rest: &'de str,
}

impl<'de> Lexer<'de> {
    pub fn new(input: &'de str) -> Self {
        Lexer { rest: input }
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Token<'de>;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.rest.chars().next()?;
        let len = if is_boundary(c) {
            c.len_utf8()
        } else {
            self.rest.find(is_boundary).unwrap_or(self.rest.len())
        };
        let literal = &self.rest[..len];
        self.rest = &self.rest[len..];

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '=' => TokenKind::Equal,
            _ => word(literal),
        };

        Some(Token { kind, literal })
    }
}

fn word(literal: &str) -> TokenKind {
    if literal.bytes().all(|b| b.is_ascii_alphabetic()) {
        return TokenKind::Ident;
    }
    if literal.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = literal.parse() {
            return TokenKind::Number(n);
        }
    }
    TokenKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn collapses_sign_runs_by_parity() {
        assert_eq!(normalize("1++++2"), "1+2");
        assert_eq!(normalize("1--2"), "1+2");
        assert_eq!(normalize("1---2"), "1-2");
        assert_eq!(normalize("1-+-+-2"), "1-2");
        assert_eq!(normalize("1+-2"), "1-2");
        assert_eq!(normalize("---5"), "-5");
        assert_eq!(normalize("--5"), "+5");
    }

    #[test]
    fn drops_whitespace_around_boundaries_only() {
        assert_eq!(normalize("  a  =  - -  b "), "a=+b");
        assert_eq!(normalize("( 1 + 2 ) * 3"), "(1+2)*3");
        assert_eq!(normalize("1 2 + x y"), "1 2+x y");
        assert_eq!(normalize("1 - - - 2"), "1-2");
    }

    #[test]
    fn blank_input_normalizes_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t "), "");
    }

    #[test]
    fn only_ascii_whitespace_is_dropped() {
        assert_eq!(normalize("1\u{a0}+2"), "1\u{a0}+2");
        assert_eq!(normalize("\u{a0}7 "), "\u{a0}7");
        assert_eq!(normalize("\t1 \n+\r 2"), "1+2");
    }

    #[test]
    fn splits_at_every_boundary() {
        let literals: Vec<_> = Lexer::new("(ab+12)^3=x").map(|t| t.literal).collect();
        assert_eq!(literals, ["(", "ab", "+", "12", ")", "^", "3", "=", "x"]);
    }

    #[test]
    fn classifies_words() {
        assert_eq!(
            kinds("007*abc/a1"),
            [
                TokenKind::Number(BigInt::from(7)),
                TokenKind::Star,
                TokenKind::Ident,
                TokenKind::Slash,
                TokenKind::Unknown,
            ]
        );
        assert_eq!(kinds("x y"), [TokenKind::Unknown]);
        assert_eq!(kinds("é"), [TokenKind::Unknown]);
    }

    #[test]
    fn displays_kind_and_literal() {
        let tokens: Vec<_> = Lexer::new("007-x").map(|t| t.to_string()).collect();
        assert_eq!(tokens, ["NUMBER 007 7", "MINUS -", "IDENTIFIER x"]);
    }
}

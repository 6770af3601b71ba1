//! Tokenizer and recursive-descent evaluator for substituted formulas.
//!
//! Operates on text that has already had every variable replaced by its value,
//! so the only tokens are numbers, `+ - * / ^`, and parentheses.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := NUMBER | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so `-2 ^ 2` is `-4`
//! and `2 ^ 3 ^ 2` is `512`.
//!
//! Every recursion passes through `unary`, which counts nesting and fails with
//! [`FormulaErrorKind::TooDeep`] past `MAX_DEPTH` so no input can exhaust the stack.

use crate::error::FormulaErrorKind;

type ParseResult<T> = std::result::Result<T, FormulaErrorKind>;

/// Deepest nesting of parentheses, unary signs and powers the parser accepts.
pub(crate) const MAX_DEPTH: usize = 256;

/// Characters allowed in a substituted expression.
const ALLOWED_SYMBOLS: &str = "+-*/^.()";

/// Returns `true` if `expression` contains only digits, whitespace and operator symbols.
pub(crate) fn is_whitelisted(expression: &str) -> bool {
    !expression.trim().is_empty()
        && expression
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || ALLOWED_SYMBOLS.contains(c))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl Token {
    fn describe(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Plus => "+".to_owned(),
            Self::Minus => "-".to_owned(),
            Self::Star => "*".to_owned(),
            Self::Slash => "/".to_owned(),
            Self::Caret => "^".to_owned(),
            Self::LParen => "(".to_owned(),
            Self::RParen => ")".to_owned(),
        }
    }
}

fn tokenize(expression: &str) -> ParseResult<Vec<(Token, usize)>> {
    let bytes = expression.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let literal = &expression[start..i];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaErrorKind::InvalidNumber(literal.to_owned()))?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            // `**` is an alias for `^`
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                tokens.push((Token::Caret, i));
                i += 2;
                continue;
            }
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            _ => return Err(FormulaErrorKind::UnauthorizedCharacters),
        };
        tokens.push((token, i));
        i += 1;
    }

    Ok(tokens)
}

/// Evaluates a fully substituted arithmetic expression.
///
/// # Errors
///
/// Returns the reason the expression is malformed. Non-finite results are not
/// rejected here; the caller checks the final value.
pub(crate) fn evaluate(expression: &str) -> ParseResult<f64> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens: &tokens, pos: 0, depth: 0 };
    let value = parser.expr()?;

    match parser.peek() {
        None => Ok(value),
        Some((token, offset)) => {
            Err(FormulaErrorKind::UnexpectedToken { token: token.describe(), offset })
        }
    }
}

struct Parser<'a> {
    tokens: &'a [(Token, usize)],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<(Token, usize)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> ParseResult<(Token, usize)> {
        let token = self.peek().ok_or(FormulaErrorKind::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, expected: Token) -> bool {
        if matches!(self.peek(), Some((token, _)) if token == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> ParseResult<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat(Token::Plus) {
                value += self.term()?;
            } else if self.eat(Token::Minus) {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> ParseResult<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat(Token::Star) {
                value *= self.unary()?;
            } else if self.eat(Token::Slash) {
                value /= self.unary()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> ParseResult<f64> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaErrorKind::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> ParseResult<f64> {
        if self.eat(Token::Minus) {
            return Ok(-self.unary()?);
        }
        if self.eat(Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> ParseResult<f64> {
        let base = self.primary()?;
        if self.eat(Token::Caret) {
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> ParseResult<f64> {
        match self.next()? {
            (Token::Number(value), _) => Ok(value),
            (Token::LParen, _) => {
                let value = self.expr()?;
                match self.next()? {
                    (Token::RParen, _) => Ok(value),
                    (token, offset) => {
                        Err(FormulaErrorKind::UnexpectedToken { token: token.describe(), offset })
                    }
                }
            }
            (token, offset) => {
                Err(FormulaErrorKind::UnexpectedToken { token: token.describe(), offset })
            }
        }
    }
}

use crate::output;
use serde_json::json;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CalcError
// ---------------------------------------------------------------------------

/// Value errors from the expression evaluator. Reported at the UI boundary,
/// never a panic.
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("illegal character: {0:?}")]
    IllegalCharacter(char),

    #[error("malformed number: {0}")]
    MalformedNumber(String),

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("division by zero")]
    DivisionByZero,
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
}

fn lex(expr: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = text
                    .parse()
                    .map_err(|_| CalcError::MalformedNumber(text.clone()))?;
                tokens.push(Token::Number(value));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            other => return Err(CalcError::IllegalCharacter(other)),
        }
    }
    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Recursive-descent evaluator for `+ - * / % ( )` and decimals.
///
/// Grammar:
///   expr    := term (('+' | '-') term)*
///   term    := factor (('*' | '/' | '%') factor)*
///   factor  := ('+' | '-')* primary
///   primary := number | '(' expr ')'
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.advance();
                    let rhs = self.factor()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= rhs;
                }
                Token::Percent => {
                    self.advance();
                    let rhs = self.factor()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value %= rhs;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.factor()
            }
            Some(Token::Minus) => {
                self.advance();
                Ok(-self.factor()?)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    Some(t) => Err(CalcError::UnexpectedToken(format!("{t:?}"))),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(t) => Err(CalcError::UnexpectedToken(format!("{t:?}"))),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

/// Evaluate one arithmetic expression.
pub fn eval(expr: &str) -> Result<f64, CalcError> {
    let mut parser = Parser {
        tokens: lex(expr)?,
        pos: 0,
    };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value),
        Some(t) => Err(CalcError::UnexpectedToken(format!("{t:?}"))),
    }
}

pub fn run(expr: &str, json: bool) -> anyhow::Result<()> {
    let value = eval(expr)?;
    if json {
        output::print_json(&json!({"expr": expr, "value": value}))?;
    } else {
        println!("{value}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Lexical analyzer for Pyrite source text.
//!
//! Produces a token vector terminated by [`TokenKind::Eof`]. Spaces, tabs,
//! carriage returns and `#` comments are skipped; newlines and `;` become
//! [`TokenKind::Newline`] tokens, except inside parentheses where line breaks
//! are insignificant.

use crate::error::ParseError;
use crate::token::{lookup_keyword, Token, TokenKind};

/// Lexes `source` into tokens. `identifier` is only used for error reporting.
pub fn lex(source: &str, identifier: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
        depth: 0,
        identifier,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    depth: u32,
    identifier: &'a str,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_blanks();
            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                    column,
                });
                return Ok(tokens);
            };

            if c == '\n' && self.depth > 0 {
                self.advance();
                continue;
            }

            let kind = self.next_kind(c)?;
            tokens.push(Token { kind, line, column });
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, line: u32, column: u32, message: impl Into<String>) -> ParseError {
        ParseError::new(self.identifier, line, column, message)
    }

    fn skip_blanks(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_kind(&mut self, c: char) -> Result<TokenKind, ParseError> {
        let (line, column) = (self.line, self.column);
        if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            return self.number();
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(self.word());
        }
        if c == '"' || c == '\'' {
            return self.string(c);
        }

        self.advance();
        let kind = match c {
            '\n' | ';' => TokenKind::Newline,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' if self.peek() == Some('/') => {
                self.advance();
                TokenKind::DoubleSlash
            }
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => {
                self.depth += 1;
                TokenKind::LParen
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RParen
            }
            ',' => TokenKind::Comma,
            '=' => TokenKind::Equals,
            other => return Err(self.error(line, column, format!("unexpected character '{other}'"))),
        };
        Ok(kind)
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        let mut is_float = false;

        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => text.push(c),
                '_' => {}
                '.' if !is_float => {
                    is_float = true;
                    text.push(c);
                }
                'e' | 'E' => {
                    let next = self.peek_at(1);
                    let signed = matches!(next, Some('+') | Some('-'));
                    let digit_at = if signed { 2 } else { 1 };
                    if !self.peek_at(digit_at).is_some_and(|d| d.is_ascii_digit()) {
                        break;
                    }
                    is_float = true;
                    text.push('e');
                    self.advance();
                    if signed {
                        text.extend(self.advance());
                    }
                    continue;
                }
                _ => break,
            }
            self.advance();
        }

        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(line, column, format!("invalid float literal '{text}'")))
        } else {
            text.parse::<i64>().map(TokenKind::Int).map_err(|_| {
                self.error(
                    line,
                    column,
                    format!("integer literal '{text}' does not fit in 64 bits"),
                )
            })
        }
    }

    fn word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        lookup_keyword(&word).unwrap_or(TokenKind::Name(word))
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let (line, column) = (self.line, self.column);
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(self.error(line, column, "unterminated string literal"));
                }
                Some(c) if c == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some(other) => {
                            // Unknown escapes are kept verbatim.
                            value.push('\\');
                            other
                        }
                        None => {
                            return Err(self.error(line, column, "unterminated string literal"))
                        }
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }
}

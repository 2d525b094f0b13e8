//! Recursive descent parser with Pratt expression parsing.
//!
//! | BP (L,R) | Operators |
//! |----------|-----------|
//! | (1,2)    | `+` `-` |
//! | (3,4)    | `*` `/` `//` `%` |
//! | prefix 5 | `-` `+` |
//! | postfix 7 | call `f(...)` |

use crate::ast::{BinOp, Constant, Expr, Module, Stmt, UnaryOp};
use crate::error::ParseError;
use crate::lexer::lex;
use crate::token::{describe, Token, TokenKind};

const PREFIX_BP: u8 = 5;
const CALL_BP: u8 = 7;

/// Deepest expression nesting accepted. Parentheses, prefix operators, calls
/// and each link of an operator chain count one level.
pub const MAX_NESTING: usize = 200;

/// Parses a complete script into a [`Module`].
///
/// `identifier` names the source in error messages.
pub fn parse(source: &str, identifier: &str) -> Result<Module, ParseError> {
    let tokens = lex(source, identifier)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        identifier,
    };
    parser.parse_module()
}

fn infix_binding_power(kind: &TokenKind) -> Option<(BinOp, u8, u8)> {
    match kind {
        TokenKind::Plus => Some((BinOp::Add, 1, 2)),
        TokenKind::Minus => Some((BinOp::Sub, 1, 2)),
        TokenKind::Star => Some((BinOp::Mult, 3, 4)),
        TokenKind::Slash => Some((BinOp::Div, 3, 4)),
        TokenKind::DoubleSlash => Some((BinOp::FloorDiv, 3, 4)),
        TokenKind::Percent => Some((BinOp::Mod, 3, 4)),
        _ => None,
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    identifier: &'a str,
}

impl Parser<'_> {
    // ========================================================================
    // Primitive operations
    // ========================================================================

    fn current(&self) -> &Token {
        // The lexer always terminates the stream with Eof, and `advance`
        // never moves past it.
        &self.tokens[self.pos]
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token, ParseError> {
        if self.at(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(context))
        }
    }

    fn unexpected(&self, context: &str) -> ParseError {
        let tok = self.current();
        ParseError::new(
            self.identifier,
            tok.line,
            tok.column,
            format!("unexpected {} {context}", describe(&tok.kind)),
        )
    }

    /// Enters one nesting level at `tok`.
    fn nest(&mut self, tok: &Token) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth <= MAX_NESTING {
            return Ok(());
        }
        let what = if tok.kind == TokenKind::LParen {
            "too many nested parentheses"
        } else {
            "expression nested too deeply"
        };
        Err(ParseError::new(
            self.identifier,
            tok.line,
            tok.column,
            format!("{what} (limit {MAX_NESTING})"),
        ))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_module(&mut self) -> Result<Module, ParseError> {
        let mut body = Vec::new();
        loop {
            while self.at(&TokenKind::Newline) {
                self.advance();
            }
            if self.at(&TokenKind::Eof) {
                break;
            }
            body.push(self.parse_stmt()?);
            match self.current().kind {
                TokenKind::Newline | TokenKind::Eof => {}
                _ => return Err(self.unexpected("after statement")),
            }
        }
        Ok(Module { body })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        if let TokenKind::Name(name) = &self.current().kind {
            if *self.peek_kind(1) == TokenKind::Equals {
                let target = name.clone();
                self.advance();
                self.advance();
                let value = self.parse_expr()?;
                return Ok(Stmt::Assign { target, value });
            }
        }
        Ok(Stmt::Expr(self.parse_expr()?))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let entry = self.depth;
        let mut lhs = self.parse_prefix()?;

        loop {
            if self.at(&TokenKind::LParen) {
                if CALL_BP < min_bp {
                    break;
                }
                let open = self.advance();
                self.nest(&open)?;
                let args = self.parse_args()?;
                lhs = Expr::Call {
                    func: Box::new(lhs),
                    args,
                };
                continue;
            }

            let Some((op, l_bp, r_bp)) = infix_binding_power(&self.current().kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let op_tok = self.advance();
            self.nest(&op_tok)?;
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::binary(lhs, op, rhs);
        }

        self.depth = entry;
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let tok = self.advance();
        let expr = match tok.kind {
            TokenKind::Int(v) => Expr::Constant(Constant::Int(v)),
            TokenKind::Float(v) => Expr::Constant(Constant::Float(v)),
            TokenKind::Str(s) => Expr::Constant(Constant::Str(s)),
            TokenKind::True => Expr::Constant(Constant::Bool(true)),
            TokenKind::False => Expr::Constant(Constant::Bool(false)),
            TokenKind::NoneKw => Expr::Constant(Constant::None),
            TokenKind::Name(n) => Expr::Name(n),
            TokenKind::Minus | TokenKind::Plus => {
                let op = if tok.kind == TokenKind::Minus {
                    UnaryOp::Neg
                } else {
                    UnaryOp::Pos
                };
                self.nest(&tok)?;
                let operand = self.parse_expr_bp(PREFIX_BP)?;
                Expr::Unary {
                    op,
                    operand: Box::new(operand),
                }
            }
            TokenKind::LParen => {
                self.nest(&tok)?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "while looking for ')'")?;
                inner
            }
            other => {
                return Err(ParseError::new(
                    self.identifier,
                    tok.line,
                    tok.column,
                    format!("expected an expression, found {}", describe(&other)),
                ))
            }
        };
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        while !self.at(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if !self.at(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(TokenKind::RParen, "in argument list")?;
        Ok(args)
    }
}

//! Syntax tree, lexer and parser for Pyrite scripts.
//!
//! The language is a small Python-flavoured subset: assignments, expression
//! statements, arithmetic over numeric and string literals, and calls. The
//! pipeline treats this crate as an interchangeable front end; only the tree
//! shapes in [`ast`] are relied upon by the optimizer.

#![warn(missing_docs)]

pub mod arith;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use arith::ArithError;
pub use ast::{BinOp, Constant, Expr, Module, Stmt, UnaryOp};
pub use error::ParseError;
pub use parser::{parse, MAX_NESTING};

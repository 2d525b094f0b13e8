//! Stack-machine execution engine for compiled Pyrite code.
//!
//! A [`Vm`] runs a [`CodeObject`](pyrite_bytecode::CodeObject) inside an
//! [`Environment`]: the module namespace (pre-seeded with `__name__` and
//! `__file__`) plus a shared, read-only [`Builtins`] table.

#![warn(missing_docs)]

pub mod builtins;
pub mod env;
pub mod error;
pub mod exec;
pub mod value;

pub use builtins::{Builtin, Builtins};
pub use env::Environment;
pub use error::RuntimeError;
pub use exec::Vm;
pub use value::Value;

//! Syntax tree and bytecode optimization passes.
//!
//! The default tree pass is [`ConstantFolder`], a deliberately shallow fold:
//! a binary node is replaced only when both of its *immediate* operands are
//! literals, and its operands are never visited first. `(1 + 2) + 3` is
//! therefore left exactly as written. [`DeepFolder`] is the opt-in recursive
//! alternative. The bytecode [`peephole`] pass is an identity transform.

#![warn(missing_docs)]

pub mod deep;
pub mod fold;
pub mod pass;
pub mod peephole;
pub mod transform;

pub use deep::DeepFolder;
pub use fold::{fold_constants, ConstantFolder};
pub use pass::optimize;
pub use peephole::peephole;
pub use transform::Transformer;

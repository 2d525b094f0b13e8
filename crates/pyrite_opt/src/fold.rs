//! Single-level arithmetic constant folding.
//!
//! [`ConstantFolder`] inspects a binary node's immediate operands only. It
//! does not fold the operands first, so a binary node whose operand is itself
//! a binary node is kept as written and its subtree is not visited. This is an
//! intentional limitation; [`DeepFolder`](crate::DeepFolder) is the recursive
//! alternative.

use pyrite_ast::{arith, ArithError, BinOp, Constant, Expr, Module};
use tracing::trace;

use crate::transform::Transformer;

/// A fold that could not be performed. Never leaves this module: the
/// folder keeps the original node instead.
#[derive(Debug)]
struct FoldError(ArithError);

/// Operators the single-level folder rewrites.
fn is_foldable(op: BinOp) -> bool {
    matches!(op, BinOp::Add | BinOp::Sub | BinOp::Mult | BinOp::Div)
}

fn try_fold(op: BinOp, left: &Constant, right: &Constant) -> Result<Constant, FoldError> {
    arith::binary(op, left, right).map_err(FoldError)
}

/// Replaces `literal op literal` with the computed literal for `+ - * /`.
#[derive(Debug, Default)]
pub struct ConstantFolder {
    folded: usize,
    abandoned: usize,
}

impl ConstantFolder {
    /// Creates a folder with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of binary nodes replaced by a literal.
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Number of eligible nodes left untouched because evaluation failed.
    pub fn abandoned(&self) -> usize {
        self.abandoned
    }
}

impl Transformer for ConstantFolder {
    fn visit_binary(&mut self, left: Box<Expr>, op: BinOp, right: Box<Expr>) -> Expr {
        if is_foldable(op) {
            if let (Some(l), Some(r)) = (left.as_constant(), right.as_constant()) {
                match try_fold(op, l, r) {
                    Ok(value) => {
                        self.folded += 1;
                        return Expr::Constant(value);
                    }
                    Err(FoldError(reason)) => {
                        self.abandoned += 1;
                        trace!(%reason, "constant fold abandoned");
                    }
                }
            }
        }
        Expr::Binary { left, op, right }
    }
}

/// Runs the single-level folder over a module.
pub fn fold_constants(module: Module) -> Module {
    ConstantFolder::new().visit_module(module)
}

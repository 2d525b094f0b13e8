//! Recursive bottom-up constant folding. Opt-in only.

use pyrite_ast::{arith, BinOp, Expr, UnaryOp};

use crate::transform::{walk_binary, walk_unary, Transformer};

/// Folds operands before their parent, so `(1 + 2) + 3` becomes `6`.
///
/// Covers all six binary operators and the prefix operators. Like the
/// single-level folder, a failed evaluation leaves the node unfolded.
#[derive(Debug, Default)]
pub struct DeepFolder {
    folded: usize,
}

impl DeepFolder {
    /// Creates a folder with a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes replaced by a literal.
    pub fn folded(&self) -> usize {
        self.folded
    }
}

impl Transformer for DeepFolder {
    fn visit_binary(&mut self, left: Box<Expr>, op: BinOp, right: Box<Expr>) -> Expr {
        let node = walk_binary(self, left, op, right);
        if let Expr::Binary { left, op, right } = &node {
            if let (Some(l), Some(r)) = (left.as_constant(), right.as_constant()) {
                if let Ok(value) = arith::binary(*op, l, r) {
                    self.folded += 1;
                    return Expr::Constant(value);
                }
            }
        }
        node
    }

    fn visit_unary(&mut self, op: UnaryOp, operand: Box<Expr>) -> Expr {
        let node = walk_unary(self, op, operand);
        if let Expr::Unary { op, operand } = &node {
            if let Some(c) = operand.as_constant() {
                if let Ok(value) = arith::unary(*op, c) {
                    self.folded += 1;
                    return Expr::Constant(value);
                }
            }
        }
        node
    }
}

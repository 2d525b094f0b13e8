//! Generic syntax tree traversal.
//!
//! A [`Transformer`] consumes nodes and returns replacements. Every hook has
//! a default that rebuilds the node from its transformed children via the
//! `walk_*` functions; an override that does not call back into a `walk_*`
//! function stops the traversal at that node.

use pyrite_ast::{BinOp, Expr, Module, Stmt, UnaryOp};

/// A consuming tree rewriter with overridable per-node hooks.
pub trait Transformer {
    /// Transforms every top-level statement in order.
    fn visit_module(&mut self, module: Module) -> Module {
        Module {
            body: module
                .body
                .into_iter()
                .map(|stmt| self.visit_stmt(stmt))
                .collect(),
        }
    }

    /// Transforms a statement.
    fn visit_stmt(&mut self, stmt: Stmt) -> Stmt {
        walk_stmt(self, stmt)
    }

    /// Transforms an expression.
    fn visit_expr(&mut self, expr: Expr) -> Expr {
        walk_expr(self, expr)
    }

    /// Transforms a binary expression. The default visits both operands.
    fn visit_binary(&mut self, left: Box<Expr>, op: BinOp, right: Box<Expr>) -> Expr {
        walk_binary(self, left, op, right)
    }

    /// Transforms a prefix expression. The default visits the operand.
    fn visit_unary(&mut self, op: UnaryOp, operand: Box<Expr>) -> Expr {
        walk_unary(self, op, operand)
    }
}

/// Rebuilds a statement from its transformed expressions.
pub fn walk_stmt<T: Transformer + ?Sized>(t: &mut T, stmt: Stmt) -> Stmt {
    match stmt {
        Stmt::Assign { target, value } => Stmt::Assign {
            target,
            value: t.visit_expr(value),
        },
        Stmt::Expr(expr) => Stmt::Expr(t.visit_expr(expr)),
    }
}

/// Dispatches an expression to its node hook, or rebuilds it from its
/// transformed children.
pub fn walk_expr<T: Transformer + ?Sized>(t: &mut T, expr: Expr) -> Expr {
    match expr {
        Expr::Binary { left, op, right } => t.visit_binary(left, op, right),
        Expr::Unary { op, operand } => t.visit_unary(op, operand),
        Expr::Call { func, args } => Expr::Call {
            func: Box::new(t.visit_expr(*func)),
            args: args.into_iter().map(|a| t.visit_expr(a)).collect(),
        },
        leaf @ (Expr::Constant(_) | Expr::Name(_)) => leaf,
    }
}

/// Rebuilds a binary node from its transformed operands.
pub fn walk_binary<T: Transformer + ?Sized>(
    t: &mut T,
    left: Box<Expr>,
    op: BinOp,
    right: Box<Expr>,
) -> Expr {
    Expr::Binary {
        left: Box::new(t.visit_expr(*left)),
        op,
        right: Box::new(t.visit_expr(*right)),
    }
}

/// Rebuilds a prefix node from its transformed operand.
pub fn walk_unary<T: Transformer + ?Sized>(t: &mut T, op: UnaryOp, operand: Box<Expr>) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(t.visit_expr(*operand)),
    }
}

//! Lowering from syntax tree to stack-machine code.
//!
//! Each statement compiles to a self-contained instruction sequence that
//! leaves the stack empty. The module ends with `LOAD_CONST None; RETURN_VALUE`.

use pyrite_ast::{Constant, Expr, Module, Stmt};

use crate::code::{CodeObject, Instr};
use crate::error::LowerError;

/// Lowers a module to a [`CodeObject`] named after `filename`.
pub fn lower(module: &Module, filename: &str) -> Result<CodeObject, LowerError> {
    let mut builder = CodeBuilder::new(filename);
    for stmt in &module.body {
        builder.stmt(stmt)?;
    }
    let none = builder.constant(&Constant::None)?;
    builder.emit(Instr::LoadConst(none));
    builder.emit(Instr::Return);
    Ok(builder.finish())
}

struct CodeBuilder {
    code: CodeObject,
}

impl CodeBuilder {
    fn new(filename: &str) -> Self {
        Self {
            code: CodeObject {
                filename: filename.to_string(),
                constants: Vec::new(),
                names: Vec::new(),
                instructions: Vec::new(),
            },
        }
    }

    fn finish(self) -> CodeObject {
        self.code
    }

    fn emit(&mut self, instr: Instr) {
        self.code.instructions.push(instr);
    }

    /// Interns a constant. Floats compare by bit pattern so that `0.0` and
    /// `-0.0` stay distinct and NaN is deduplicated.
    fn constant(&mut self, value: &Constant) -> Result<u32, LowerError> {
        let existing = self
            .code
            .constants
            .iter()
            .position(|c| same_constant(c, value));
        let idx = match existing {
            Some(idx) => idx,
            None => {
                self.code.constants.push(value.clone());
                self.code.constants.len() - 1
            }
        };
        u32::try_from(idx).map_err(|_| LowerError::TooManyConstants {
            filename: self.code.filename.clone(),
            limit: u32::MAX,
        })
    }

    fn name(&mut self, name: &str) -> Result<u32, LowerError> {
        let idx = match self.code.names.iter().position(|n| n == name) {
            Some(idx) => idx,
            None => {
                self.code.names.push(name.to_string());
                self.code.names.len() - 1
            }
        };
        u32::try_from(idx).map_err(|_| LowerError::TooManyNames {
            filename: self.code.filename.clone(),
            limit: u32::MAX,
        })
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), LowerError> {
        match stmt {
            Stmt::Assign { target, value } => {
                self.expr(value)?;
                let idx = self.name(target)?;
                self.emit(Instr::StoreName(idx));
            }
            Stmt::Expr(expr) => {
                self.expr(expr)?;
                self.emit(Instr::Pop);
            }
        }
        Ok(())
    }

    fn expr(&mut self, expr: &Expr) -> Result<(), LowerError> {
        match expr {
            Expr::Constant(c) => {
                let idx = self.constant(c)?;
                self.emit(Instr::LoadConst(idx));
            }
            Expr::Name(n) => {
                let idx = self.name(n)?;
                self.emit(Instr::LoadName(idx));
            }
            Expr::Unary { op, operand } => {
                self.expr(operand)?;
                self.emit(Instr::Unary(*op));
            }
            Expr::Binary { left, op, right } => {
                self.expr(left)?;
                self.expr(right)?;
                self.emit(Instr::Binary(*op));
            }
            Expr::Call { func, args } => {
                self.expr(func)?;
                for arg in args {
                    self.expr(arg)?;
                }
                let argc = u32::try_from(args.len()).map_err(|_| LowerError::TooManyArguments {
                    filename: self.code.filename.clone(),
                    count: args.len(),
                })?;
                self.emit(Instr::Call(argc));
            }
        }
        Ok(())
    }
}

fn same_constant(a: &Constant, b: &Constant) -> bool {
    match (a, b) {
        (Constant::Float(x), Constant::Float(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

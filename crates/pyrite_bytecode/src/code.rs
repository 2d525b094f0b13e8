//! Stack-machine instructions and the compiled code object.

use std::fmt;

use pyrite_ast::{BinOp, Constant, UnaryOp};
use serde::{Deserialize, Serialize};

/// A single stack-machine instruction.
///
/// Operands index into the owning [`CodeObject`]'s constant and name tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instr {
    /// Push `constants[i]`.
    LoadConst(u32),
    /// Push the value bound to `names[i]`, falling back to builtins.
    LoadName(u32),
    /// Pop a value and bind it to `names[i]`.
    StoreName(u32),
    /// Pop right then left, push `left op right`.
    Binary(BinOp),
    /// Pop an operand, push `op operand`.
    Unary(UnaryOp),
    /// Pop `argc` arguments then the callee, push the call result.
    Call(u32),
    /// Discard the top of stack.
    Pop,
    /// Pop the top of stack and finish execution with it.
    Return,
}

/// Executable form of one script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeObject {
    /// Identifier of the source this was compiled from.
    pub filename: String,
    /// Constant pool.
    pub constants: Vec<Constant>,
    /// Name table for loads and stores.
    pub names: Vec<String>,
    /// Instruction stream. Always ends with [`Instr::Return`].
    pub instructions: Vec<Instr>,
}

impl CodeObject {
    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if there are no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Renders a disassembly listing, one instruction per line.
impl fmt::Display for CodeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "code object for {}:", self.filename)?;
        for (offset, instr) in self.instructions.iter().enumerate() {
            write!(f, "{offset:>6}  ")?;
            match *instr {
                Instr::LoadConst(i) => {
                    let c = self.constants.get(i as usize);
                    write!(f, "LOAD_CONST    {i:>4} ({})", display_constant(c))?
                }
                Instr::LoadName(i) => write!(f, "LOAD_NAME     {i:>4} ({})", self.name(i))?,
                Instr::StoreName(i) => write!(f, "STORE_NAME    {i:>4} ({})", self.name(i))?,
                Instr::Binary(op) => write!(f, "BINARY_OP          ({op})")?,
                Instr::Unary(UnaryOp::Neg) => write!(f, "UNARY_NEGATIVE")?,
                Instr::Unary(UnaryOp::Pos) => write!(f, "UNARY_POSITIVE")?,
                Instr::Call(argc) => write!(f, "CALL          {argc:>4}")?,
                Instr::Pop => write!(f, "POP_TOP")?,
                Instr::Return => write!(f, "RETURN_VALUE")?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl CodeObject {
    fn name(&self, i: u32) -> &str {
        self.names.get(i as usize).map_or("?", String::as_str)
    }
}

fn display_constant(c: Option<&Constant>) -> String {
    match c {
        Some(Constant::Str(s)) => format!("{s:?}"),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}

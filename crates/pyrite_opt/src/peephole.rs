//! Bytecode peephole pass.

use pyrite_bytecode::CodeObject;

/// Runs the peephole pass over compiled code.
///
/// No rewrites are implemented; the code object is returned unchanged.
pub fn peephole(code: CodeObject) -> CodeObject {
    code
}

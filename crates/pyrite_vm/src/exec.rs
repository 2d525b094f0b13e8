//! The interpreter loop.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use pyrite_ast::{arith, ArithError, BinOp, UnaryOp};
use pyrite_bytecode::{CodeObject, Instr};
use tracing::debug;

use crate::builtins::Builtins;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::Value;

/// Executes code objects against a shared builtin table.
///
/// Program output (`print`) goes to the sink given at construction; it is
/// guarded by a mutex so one `Vm` can be shared between threads.
pub struct Vm {
    builtins: Arc<Builtins>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl Vm {
    /// A machine with the standard builtins writing to stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }

    /// A machine with the standard builtins writing to `output`.
    pub fn with_output(output: impl Write + Send + 'static) -> Self {
        Self {
            builtins: Arc::new(Builtins::standard()),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// Replaces the builtin table.
    pub fn with_builtins(mut self, builtins: Builtins) -> Self {
        self.builtins = Arc::new(builtins);
        self
    }

    /// The builtin table shared by every environment this machine creates.
    pub fn builtins(&self) -> &Arc<Builtins> {
        &self.builtins
    }

    /// Creates a fresh module namespace.
    pub fn environment(&self, module_name: &str, source_identity: &str) -> Environment {
        Environment::new(module_name, source_identity, Arc::clone(&self.builtins))
    }

    /// Runs `code` to completion and returns the value it returned.
    pub fn execute(&self, code: &CodeObject, env: &mut Environment) -> Result<Value, RuntimeError> {
        debug!(
            filename = %code.filename,
            instructions = code.len(),
            "executing code object"
        );
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        let mut frame = Frame {
            code,
            stack: Vec::new(),
        };
        let result = frame.run(env, &mut **out);
        out.flush().map_err(|e| RuntimeError::Output(e.to_string()))?;
        result
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("builtins", &self.builtins.names())
            .finish_non_exhaustive()
    }
}

struct Frame<'a> {
    code: &'a CodeObject,
    stack: Vec<Value>,
}

impl Frame<'_> {
    fn run(&mut self, env: &mut Environment, out: &mut dyn Write) -> Result<Value, RuntimeError> {
        let code = self.code;
        for instr in &code.instructions {
            match *instr {
                Instr::LoadConst(i) => {
                    let value = code
                        .constants
                        .get(i as usize)
                        .cloned()
                        .ok_or_else(|| self.invalid(format!("constant index {i} out of range")))?;
                    self.stack.push(Value::Data(value));
                }
                Instr::LoadName(i) => {
                    let name = self.name(i)?;
                    let value = env
                        .lookup(name)
                        .ok_or_else(|| RuntimeError::NameError(name.to_string()))?;
                    self.stack.push(value);
                }
                Instr::StoreName(i) => {
                    let value = self.pop()?;
                    let name = self.name(i)?;
                    env.set(name, value);
                }
                Instr::Binary(op) => {
                    let right = self.pop()?;
                    let left = self.pop()?;
                    self.stack.push(binary(op, &left, &right)?);
                }
                Instr::Unary(op) => {
                    let operand = self.pop()?;
                    self.stack.push(unary(op, &operand)?);
                }
                Instr::Call(argc) => {
                    let argc = argc as usize;
                    if self.stack.len() <= argc {
                        return Err(self.invalid(format!("stack underflow calling with {argc} args")));
                    }
                    let args = self.stack.split_off(self.stack.len() - argc);
                    let result = match self.pop()? {
                        Value::Builtin(b) => b.call(out, &args)?,
                        other => {
                            return Err(RuntimeError::NotCallable(other.type_name().to_string()))
                        }
                    };
                    self.stack.push(result);
                }
                Instr::Pop => {
                    self.pop()?;
                }
                Instr::Return => return self.pop(),
            }
        }
        Err(self.invalid("instruction stream does not end with a return".to_string()))
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or_else(|| self.invalid("stack underflow".to_string()))
    }

    fn name(&self, i: u32) -> Result<&str, RuntimeError> {
        self.code
            .names
            .get(i as usize)
            .map(String::as_str)
            .ok_or_else(|| self.invalid(format!("name index {i} out of range")))
    }

    fn invalid(&self, reason: String) -> RuntimeError {
        RuntimeError::InvalidCode {
            filename: self.code.filename.clone(),
            reason,
        }
    }
}

fn binary(op: BinOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (left.as_data(), right.as_data()) {
        (Some(l), Some(r)) => Ok(Value::Data(arith::binary(op, l, r)?)),
        _ => Err(ArithError::UnsupportedOperands {
            op: op.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        }
        .into()),
    }
}

fn unary(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    match operand.as_data() {
        Some(c) => Ok(Value::Data(arith::unary(op, c)?)),
        None => Err(ArithError::UnsupportedOperand {
            op: match op {
                UnaryOp::Neg => "-",
                UnaryOp::Pos => "+",
            },
            operand: operand.type_name(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyrite_ast::{parse, Constant};
    use pyrite_bytecode::lower;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn run(src: &str) -> (Result<Environment, RuntimeError>, String) {
        let capture = Capture::default();
        let vm = Vm::with_output(capture.clone());
        let code = lower(&parse(src, "t.py").unwrap(), "t.py").unwrap();
        let mut env = vm.environment("__main__", "t.py");
        let result = vm.execute(&code, &mut env).map(|ret| {
            assert_eq!(ret, Value::NONE);
            env
        });
        (result, capture.text())
    }

    #[test]
    fn prints_and_binds() {
        let (env, out) = run("x = 2 * 3\ny = x + 1\nprint(x, y, 'done')");
        let env = env.unwrap();
        assert_eq!(out, "6 7 done\n");
        assert_eq!(env.get("y"), Some(&Value::int(7)));
    }

    #[test]
    fn module_identity_is_visible() {
        let (_, out) = run("print(__name__, __file__)");
        assert_eq!(out, "__main__ t.py\n");
    }

    #[test]
    fn python_division_semantics() {
        let (_, out) = run("print(7 / 2, 7 // 2, -7 // 2, -7 % 3, 6 / 3)");
        assert_eq!(out, "3.5 3 -4 2 2.0\n");
    }

    #[test]
    fn runtime_errors() {
        let (result, _) = run("print(1 / 0)");
        assert_eq!(result.unwrap_err(), RuntimeError::ZeroDivision);

        let (result, _) = run("print(undefined)");
        assert_eq!(
            result.unwrap_err(),
            RuntimeError::NameError("undefined".to_string())
        );

        let (result, _) = run("x = 'a' - 1");
        assert!(matches!(result, Err(RuntimeError::TypeError(_))));

        let (result, _) = run("x = 3\nx(1)");
        assert_eq!(
            result.unwrap_err(),
            RuntimeError::NotCallable("int".to_string())
        );
    }

    #[test]
    fn output_before_an_error_is_kept() {
        let (result, out) = run("print('before')\nprint(1 // 0)");
        assert!(result.is_err());
        assert_eq!(out, "before\n");
    }

    #[test]
    fn builtin_as_operand_is_a_type_error() {
        let (result, _) = run("x = print + 1");
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "TypeError: unsupported operand type(s) for +: 'builtin_function_or_method' and 'int'"
        );
    }

    #[test]
    fn malformed_code_is_rejected() {
        let vm = Vm::with_output(Capture::default());
        let mut env = vm.environment("__main__", "bad");
        let code = CodeObject {
            filename: "bad".to_string(),
            constants: vec![Constant::Int(1)],
            names: vec![],
            instructions: vec![Instr::LoadConst(5), Instr::Return],
        };
        assert!(matches!(
            vm.execute(&code, &mut env),
            Err(RuntimeError::InvalidCode { .. })
        ));

        let underflow = CodeObject {
            instructions: vec![Instr::Pop, Instr::Return],
            ..code.clone()
        };
        assert!(matches!(
            vm.execute(&underflow, &mut env),
            Err(RuntimeError::InvalidCode { .. })
        ));

        let unterminated = CodeObject {
            instructions: vec![Instr::LoadConst(0)],
            ..code
        };
        assert!(matches!(
            vm.execute(&unterminated, &mut env),
            Err(RuntimeError::InvalidCode { .. })
        ));
    }
}

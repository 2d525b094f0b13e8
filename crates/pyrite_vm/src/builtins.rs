//! The builtin function table.
//!
//! One [`Builtins`] table is shared, read-only, by every environment created
//! from the same [`Vm`](crate::Vm).

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use pyrite_ast::Constant;

use crate::error::RuntimeError;
use crate::value::Value;

/// Signature of a builtin: program output sink and positional arguments.
pub type BuiltinFn = fn(&mut dyn Write, &[Value]) -> Result<Value, RuntimeError>;

/// A named builtin function.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    /// Creates a builtin.
    pub const fn new(name: &'static str, func: BuiltinFn) -> Self {
        Self { name, func }
    }

    /// The name the builtin is bound to.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes the builtin.
    pub fn call(&self, out: &mut dyn Write, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.func)(out, args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Symbol table of builtin functions.
#[derive(Debug, Clone)]
pub struct Builtins {
    table: HashMap<&'static str, Builtin>,
}

impl Builtins {
    /// The standard builtins: `print`, `len`, `str`, `int`, `float`, `abs`.
    pub fn standard() -> Self {
        let mut builtins = Self {
            table: HashMap::new(),
        };
        for b in [
            Builtin::new("print", builtin_print),
            Builtin::new("len", builtin_len),
            Builtin::new("str", builtin_str),
            Builtin::new("int", builtin_int),
            Builtin::new("float", builtin_float),
            Builtin::new("abs", builtin_abs),
        ] {
            builtins.register(b);
        }
        builtins
    }

    /// Adds or replaces a builtin.
    pub fn register(&mut self, builtin: Builtin) {
        self.table.insert(builtin.name, builtin);
    }

    /// Looks up a builtin by name.
    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.table.get(name).copied()
    }

    /// Sorted builtin names.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.table.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::standard()
    }
}

fn arity(name: &str, args: &[Value], max: usize) -> Result<(), RuntimeError> {
    if args.len() > max {
        return Err(RuntimeError::TypeError(format!(
            "{name}() takes at most {max} argument{} ({} given)",
            if max == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(())
}

fn exactly_one<'a>(name: &str, args: &'a [Value]) -> Result<&'a Value, RuntimeError> {
    match args {
        [v] => Ok(v),
        _ => Err(RuntimeError::TypeError(format!(
            "{name}() takes exactly one argument ({} given)",
            args.len()
        ))),
    }
}

fn builtin_print(out: &mut dyn Write, args: &[Value]) -> Result<Value, RuntimeError> {
    let line = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{line}").map_err(|e| RuntimeError::Output(e.to_string()))?;
    Ok(Value::NONE)
}

fn builtin_len(_: &mut dyn Write, args: &[Value]) -> Result<Value, RuntimeError> {
    match exactly_one("len", args)? {
        Value::Data(Constant::Str(s)) => Ok(Value::int(s.chars().count() as i64)),
        other => Err(RuntimeError::TypeError(format!(
            "object of type '{}' has no len()",
            other.type_name()
        ))),
    }
}

fn builtin_str(_: &mut dyn Write, args: &[Value]) -> Result<Value, RuntimeError> {
    arity("str", args, 1)?;
    Ok(Value::str(
        args.first().map(Value::to_string).unwrap_or_default(),
    ))
}

fn builtin_int(_: &mut dyn Write, args: &[Value]) -> Result<Value, RuntimeError> {
    arity("int", args, 1)?;
    let Some(arg) = args.first() else {
        return Ok(Value::int(0));
    };
    match arg {
        Value::Data(Constant::Int(v)) => Ok(Value::int(*v)),
        Value::Data(Constant::Bool(b)) => Ok(Value::int(i64::from(*b))),
        Value::Data(Constant::Float(f)) => {
            if f.is_nan() {
                return Err(RuntimeError::ValueError(
                    "cannot convert float NaN to integer".to_string(),
                ));
            }
            let t = f.trunc();
            if t < -(2f64.powi(63)) || t >= 2f64.powi(63) {
                return Err(RuntimeError::Overflow(
                    "cannot convert float to 64-bit integer".to_string(),
                ));
            }
            Ok(Value::int(t as i64))
        }
        Value::Data(Constant::Str(s)) => s.trim().replace('_', "").parse::<i64>().map(Value::int).map_err(|_| {
            RuntimeError::ValueError(format!("invalid literal for int() with base 10: '{s}'"))
        }),
        other => Err(RuntimeError::TypeError(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

fn builtin_float(_: &mut dyn Write, args: &[Value]) -> Result<Value, RuntimeError> {
    arity("float", args, 1)?;
    let value = match args.first() {
        None => 0.0,
        Some(Value::Data(Constant::Int(v))) => *v as f64,
        Some(Value::Data(Constant::Bool(b))) => f64::from(u8::from(*b)),
        Some(Value::Data(Constant::Float(f))) => *f,
        Some(Value::Data(Constant::Str(s))) => s.trim().parse::<f64>().map_err(|_| {
            RuntimeError::ValueError(format!("could not convert string to float: '{s}'"))
        })?,
        Some(other) => {
            return Err(RuntimeError::TypeError(format!(
                "float() argument must be a string or a number, not '{}'",
                other.type_name()
            )))
        }
    };
    Ok(Value::Data(Constant::Float(value)))
}

fn builtin_abs(_: &mut dyn Write, args: &[Value]) -> Result<Value, RuntimeError> {
    match exactly_one("abs", args)? {
        Value::Data(Constant::Int(v)) => v
            .checked_abs()
            .map(Value::int)
            .ok_or_else(|| RuntimeError::Overflow("integer absolute value overflow".to_string())),
        Value::Data(Constant::Bool(b)) => Ok(Value::int(i64::from(*b))),
        Value::Data(Constant::Float(f)) => Ok(Value::Data(Constant::Float(f.abs()))),
        other => Err(RuntimeError::TypeError(format!(
            "bad operand type for abs(): '{}'",
            other.type_name()
        ))),
    }
}

//! Arithmetic over literal values.
//!
//! Shared by the constant folder and the execution engine so that a folded
//! literal always equals what the unfolded expression evaluates to at run
//! time. Semantics follow Python: `/` always yields a float, `//` and `%`
//! round towards negative infinity, `bool` behaves as an integer, strings
//! concatenate with `+` and repeat with `*`.

use crate::ast::{BinOp, Constant, UnaryOp};

/// Upper bound on the byte length of a string produced by repetition.
const MAX_STR_LEN: usize = 1 << 30;

/// Why an arithmetic operation could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    /// Division or modulo by zero.
    #[error("division by zero")]
    ZeroDivision,
    /// The integer result does not fit in 64 bits, or a string would be too large.
    #[error("result of '{0}' is too large")]
    Overflow(&'static str),
    /// The operator does not apply to these operand types.
    #[error("unsupported operand type(s) for {op}: '{left}' and '{right}'")]
    UnsupportedOperands {
        /// Operator spelling.
        op: &'static str,
        /// Left operand type name.
        left: &'static str,
        /// Right operand type name.
        right: &'static str,
    },
    /// The prefix operator does not apply to this operand type.
    #[error("bad operand type for unary {op}: '{operand}'")]
    UnsupportedOperand {
        /// Operator spelling.
        op: &'static str,
        /// Operand type name.
        operand: &'static str,
    },
}

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(c: &Constant) -> Option<Num> {
    match c {
        Constant::Bool(b) => Some(Num::Int(i64::from(*b))),
        Constant::Int(v) => Some(Num::Int(*v)),
        Constant::Float(v) => Some(Num::Float(*v)),
        _ => None,
    }
}

fn as_count(c: &Constant) -> Option<i64> {
    match c {
        Constant::Bool(b) => Some(i64::from(*b)),
        Constant::Int(v) => Some(*v),
        _ => None,
    }
}

/// Applies a binary operator to two literal values.
pub fn binary(op: BinOp, left: &Constant, right: &Constant) -> Result<Constant, ArithError> {
    if let (Some(l), Some(r)) = (as_num(left), as_num(right)) {
        return numeric(op, l, r);
    }

    match (op, left, right) {
        (BinOp::Add, Constant::Str(a), Constant::Str(b)) => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Constant::Str(s))
        }
        (BinOp::Mult, Constant::Str(s), n) | (BinOp::Mult, n, Constant::Str(s))
            if as_count(n).is_some() =>
        {
            let count = as_count(n).unwrap_or(0);
            repeat(s, count)
        }
        _ => Err(ArithError::UnsupportedOperands {
            op: op.symbol(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

/// Applies a prefix operator to a literal value.
pub fn unary(op: UnaryOp, operand: &Constant) -> Result<Constant, ArithError> {
    match (op, as_num(operand)) {
        (UnaryOp::Neg, Some(Num::Int(v))) => v
            .checked_neg()
            .map(Constant::Int)
            .ok_or(ArithError::Overflow("-")),
        (UnaryOp::Neg, Some(Num::Float(v))) => Ok(Constant::Float(-v)),
        (UnaryOp::Pos, Some(Num::Int(v))) => Ok(Constant::Int(v)),
        (UnaryOp::Pos, Some(Num::Float(v))) => Ok(Constant::Float(v)),
        (op, None) => Err(ArithError::UnsupportedOperand {
            op: match op {
                UnaryOp::Neg => "-",
                UnaryOp::Pos => "+",
            },
            operand: operand.type_name(),
        }),
    }
}

fn repeat(s: &str, count: i64) -> Result<Constant, ArithError> {
    if count <= 0 {
        return Ok(Constant::Str(String::new()));
    }
    let count = usize::try_from(count).map_err(|_| ArithError::Overflow("*"))?;
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_STR_LEN => Ok(Constant::Str(s.repeat(count))),
        _ => Err(ArithError::Overflow("*")),
    }
}

fn numeric(op: BinOp, l: Num, r: Num) -> Result<Constant, ArithError> {
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => int_op(op, a, b),
        (Num::Int(a), Num::Float(b)) => float_op(op, a as f64, b),
        (Num::Float(a), Num::Int(b)) => float_op(op, a, b as f64),
        (Num::Float(a), Num::Float(b)) => float_op(op, a, b),
    }
}

fn int_op(op: BinOp, a: i64, b: i64) -> Result<Constant, ArithError> {
    let overflow = ArithError::Overflow(op.symbol());
    let value = match op {
        BinOp::Add => a.checked_add(b).ok_or(overflow)?,
        BinOp::Sub => a.checked_sub(b).ok_or(overflow)?,
        BinOp::Mult => a.checked_mul(b).ok_or(overflow)?,
        BinOp::Div => return float_op(op, a as f64, b as f64),
        BinOp::FloorDiv => {
            if b == 0 {
                return Err(ArithError::ZeroDivision);
            }
            let q = a.checked_div(b).ok_or(overflow)?;
            if a % b != 0 && ((a < 0) != (b < 0)) {
                q - 1
            } else {
                q
            }
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(ArithError::ZeroDivision);
            }
            // i64::MIN % -1 overflows in Rust but is 0 mathematically.
            let r = a.checked_rem(b).unwrap_or(0);
            if r != 0 && ((r < 0) != (b < 0)) {
                r + b
            } else {
                r
            }
        }
    };
    Ok(Constant::Int(value))
}

fn float_op(op: BinOp, a: f64, b: f64) -> Result<Constant, ArithError> {
    let value = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mult => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(ArithError::ZeroDivision);
            }
            a / b
        }
        BinOp::FloorDiv => {
            if b == 0.0 {
                return Err(ArithError::ZeroDivision);
            }
            (a / b).floor()
        }
        BinOp::Mod => {
            if b == 0.0 {
                return Err(ArithError::ZeroDivision);
            }
            let r = a % b;
            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }
    };
    Ok(Constant::Float(value))
}

//! Runtime error type.

use pyrite_ast::ArithError;

/// An error raised while executing code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// A name is bound neither in the module namespace nor in builtins.
    #[error("NameError: name '{0}' is not defined")]
    NameError(String),

    /// An operation was applied to values of the wrong type.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// A call targeted a value that is not a function. Holds its type name.
    #[error("TypeError: '{0}' object is not callable")]
    NotCallable(String),

    /// A conversion received a value of the right type but wrong content.
    #[error("ValueError: {0}")]
    ValueError(String),

    /// Division or modulo by zero.
    #[error("ZeroDivisionError: division by zero")]
    ZeroDivision,

    /// An integer result does not fit in 64 bits.
    #[error("OverflowError: {0}")]
    Overflow(String),

    /// Writing program output failed.
    #[error("OSError: cannot write output: {0}")]
    Output(String),

    /// The code object is malformed (bad operand index or stack underflow).
    #[error("invalid code object {filename}: {reason}")]
    InvalidCode {
        /// The code object's filename.
        filename: String,
        /// What was wrong.
        reason: String,
    },
}

impl From<ArithError> for RuntimeError {
    fn from(err: ArithError) -> Self {
        match err {
            ArithError::ZeroDivision => RuntimeError::ZeroDivision,
            ArithError::Overflow(_) => RuntimeError::Overflow(err.to_string()),
            ArithError::UnsupportedOperands { .. } | ArithError::UnsupportedOperand { .. } => {
                RuntimeError::TypeError(err.to_string())
            }
        }
    }
}

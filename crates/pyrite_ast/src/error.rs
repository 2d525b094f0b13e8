//! Parse error type.

/// A syntax error in a script.
///
/// Parsing stops at the first error; the position is 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{identifier}:{line}:{column}: {message}")]
pub struct ParseError {
    /// The source identifier the error was found in.
    pub identifier: String,
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column.
    pub column: u32,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(identifier: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            identifier: identifier.to_string(),
            line,
            column,
            message: message.into(),
        }
    }
}

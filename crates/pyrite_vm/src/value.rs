//! Runtime values.

use std::fmt;

use pyrite_ast::Constant;

use crate::builtins::Builtin;

/// A value on the stack or bound in a namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Literal data: `None`, booleans, numbers and strings.
    Data(Constant),
    /// A builtin function.
    Builtin(Builtin),
}

impl Value {
    /// The `None` value.
    pub const NONE: Value = Value::Data(Constant::None);

    /// Builds a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Data(Constant::Str(s.into()))
    }

    /// Builds an integer value.
    pub fn int(v: i64) -> Self {
        Value::Data(Constant::Int(v))
    }

    /// Python-style type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Data(c) => c.type_name(),
            Value::Builtin(_) => "builtin_function_or_method",
        }
    }

    /// Returns the literal payload, if this is data.
    pub fn as_data(&self) -> Option<&Constant> {
        match self {
            Value::Data(c) => Some(c),
            Value::Builtin(_) => None,
        }
    }
}

impl From<Constant> for Value {
    fn from(c: Constant) -> Self {
        Value::Data(c)
    }
}

/// `str()` rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Data(c) => write!(f, "{c}"),
            Value::Builtin(b) => write!(f, "<built-in function {}>", b.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_str() {
        assert_eq!(Value::NONE.to_string(), "None");
        assert_eq!(Value::int(3).to_string(), "3");
        assert_eq!(Value::str("hi").to_string(), "hi");
        assert_eq!(Value::Data(Constant::Float(2.0)).to_string(), "2.0");
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::int(1).type_name(), "int");
        assert_eq!(Value::NONE.type_name(), "NoneType");
    }
}

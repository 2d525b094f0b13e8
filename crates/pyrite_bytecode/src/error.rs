//! Error types for lowering and container encoding.

/// Errors raised while lowering a syntax tree to a [`CodeObject`](crate::CodeObject).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// More distinct constants than an instruction operand can index.
    #[error("too many constants in {filename} (limit {limit})")]
    TooManyConstants {
        /// The code object's filename.
        filename: String,
        /// The operand limit.
        limit: u32,
    },

    /// More distinct names than an instruction operand can index.
    #[error("too many names in {filename} (limit {limit})")]
    TooManyNames {
        /// The code object's filename.
        filename: String,
        /// The operand limit.
        limit: u32,
    },

    /// A call has more arguments than an instruction operand can hold.
    #[error("call with {count} arguments in {filename} exceeds the limit")]
    TooManyArguments {
        /// The code object's filename.
        filename: String,
        /// Number of arguments in the call.
        count: usize,
    },
}

/// An artifact payload that could not be serialized or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct PayloadError {
    /// Description of the failure.
    pub reason: String,
}

impl PayloadError {
    /// Creates a new payload error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors produced by the container codec.
///
/// Container errors carry no path; callers that read containers from disk
/// attach the offending file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// The leading bytes are not the canonical container magic.
    #[error("invalid container magic: found {}", hex(.found))]
    InvalidMagic {
        /// The bytes found where the magic was expected (up to four).
        found: Vec<u8>,
    },

    /// The header is truncated or the payload does not deserialize.
    #[error("corrupt container payload: {reason}")]
    CorruptPayload {
        /// Description of the corruption.
        reason: String,
    },

    /// The artifact could not be serialized.
    #[error("cannot serialize artifact: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}

fn hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }
    bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}

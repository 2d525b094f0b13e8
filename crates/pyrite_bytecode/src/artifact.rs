//! Serialization boundary for compiled artifacts.

use bincode::config::Config;

use crate::code::CodeObject;
use crate::error::PayloadError;

/// Largest payload, in bytes, that [`Artifact::from_bytes`] will decode for a
/// [`CodeObject`]. Length prefixes claiming more than this are rejected
/// before anything is allocated.
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;

fn payload_config() -> impl Config {
    bincode::config::standard().with_limit::<MAX_PAYLOAD_LEN>()
}

/// A compiled artifact that can be stored in a container.
///
/// The cache and the container codec treat artifacts as opaque blobs; this
/// trait is the only capability they rely on. `from_bytes` must reject input
/// with trailing garbage so that corruption is detected rather than ignored.
pub trait Artifact: Sized {
    /// Serializes the artifact.
    fn to_bytes(&self) -> Result<Vec<u8>, PayloadError>;

    /// Deserializes an artifact from exactly `bytes`.
    fn from_bytes(bytes: &[u8]) -> Result<Self, PayloadError>;
}

impl Artifact for CodeObject {
    fn to_bytes(&self) -> Result<Vec<u8>, PayloadError> {
        bincode::serde::encode_to_vec(self, payload_config())
            .map_err(|e| PayloadError::new(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.len() > MAX_PAYLOAD_LEN {
            return Err(PayloadError::new(format!(
                "payload of {} bytes exceeds the {MAX_PAYLOAD_LEN} byte limit",
                bytes.len()
            )));
        }
        let (code, consumed): (CodeObject, usize) =
            bincode::serde::decode_from_slice(bytes, payload_config())
                .map_err(|e| PayloadError::new(e.to_string()))?;
        if consumed != bytes.len() {
            return Err(PayloadError::new(format!(
                "{} trailing bytes after code object",
                bytes.len() - consumed
            )));
        }
        if code.instructions.last() != Some(&crate::Instr::Return) {
            return Err(PayloadError::new("code object does not end with RETURN_VALUE"));
        }
        Ok(code)
    }
}

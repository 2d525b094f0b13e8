//! Binary container format for persisted artifacts.
//!
//! Layout (all integers little-endian):
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 4    | magic ([`CONTAINER_MAGIC`]) |
//! | 4      | 4    | source mtime, seconds, modulo 2^32 |
//! | 8      | 4    | source size, bytes, modulo 2^32 |
//! | 12     | 4    | reserved, zero |
//! | 16     | ..   | serialized artifact, no length prefix |
//!
//! The mtime and size are informational. Decoding never compares them
//! against a live source file, since running a container is meant to bypass
//! the source entirely.

use tracing::trace;

use crate::artifact::Artifact;
use crate::error::ContainerError;

/// Magic tag identifying this compiler's container format.
///
/// The second byte is the format version. The trailing CR LF makes the
/// container unreadable after newline translation, like the CPython tag it
/// is modelled on.
pub const CONTAINER_MAGIC: [u8; 4] = [0xB7, 0x01, b'\r', b'\n'];

/// Fixed header length in bytes.
pub const HEADER_LEN: usize = 16;

/// Implementation tag used in container file names, e.g. `pyrite-01`.
pub const IMPLEMENTATION_TAG: &str = concat!(
    "pyrite-",
    env!("CARGO_PKG_VERSION_MAJOR"),
    env!("CARGO_PKG_VERSION_MINOR")
);

/// The decoded 16-byte container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Always [`CONTAINER_MAGIC`] for a header this crate accepted.
    pub magic: [u8; 4],
    /// Source modification time, seconds since the epoch, modulo 2^32.
    pub source_mtime: u32,
    /// Source size in bytes, modulo 2^32.
    pub source_size: u32,
}

impl ContainerHeader {
    /// Builds a header for a source with the given metadata.
    ///
    /// Both values are truncated to their low 32 bits, so a source of 4 GiB
    /// or more records its size modulo 2^32.
    pub fn new(source_mtime: u64, source_size: u64) -> Self {
        Self {
            magic: CONTAINER_MAGIC,
            source_mtime: (source_mtime & 0xFFFF_FFFF) as u32,
            source_size: (source_size & 0xFFFF_FFFF) as u32,
        }
    }

    /// Serializes the header, including the four reserved zero bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.magic);
        out[4..8].copy_from_slice(&self.source_mtime.to_le_bytes());
        out[8..12].copy_from_slice(&self.source_size.to_le_bytes());
        out
    }

    /// Parses and validates the header at the start of `bytes`.
    ///
    /// The magic is checked before anything else; a mismatch never looks
    /// further into the buffer.
    pub fn parse(bytes: &[u8]) -> Result<Self, ContainerError> {
        let magic = bytes.get(..4).unwrap_or(bytes);
        if magic != CONTAINER_MAGIC {
            return Err(ContainerError::InvalidMagic {
                found: magic.to_vec(),
            });
        }
        if bytes.len() < HEADER_LEN {
            return Err(ContainerError::CorruptPayload {
                reason: format!(
                    "header truncated: {} of {HEADER_LEN} bytes",
                    bytes.len()
                ),
            });
        }
        Ok(Self {
            magic: CONTAINER_MAGIC,
            source_mtime: read_u32(&bytes[4..8]),
            source_size: read_u32(&bytes[8..12]),
        })
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

/// A decoded container: header metadata plus the artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Container<A> {
    /// The validated header.
    pub header: ContainerHeader,
    /// The deserialized artifact.
    pub artifact: A,
}

/// Encodes `artifact` into a container.
///
/// `source_mtime` and `source_size` are masked to 32 bits.
pub fn encode<A: Artifact>(
    artifact: &A,
    source_mtime: u64,
    source_size: u64,
) -> Result<Vec<u8>, ContainerError> {
    let payload = artifact
        .to_bytes()
        .map_err(|e| ContainerError::Serialization { reason: e.reason })?;
    let header = ContainerHeader::new(source_mtime, source_size);

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);
    trace!(payload_len = payload.len(), "encoded container");
    Ok(out)
}

/// Decodes a container, returning only the artifact.
pub fn decode<A: Artifact>(bytes: &[u8]) -> Result<A, ContainerError> {
    decode_container(bytes).map(|c| c.artifact)
}

/// Decodes a container, returning the header alongside the artifact.
pub fn decode_container<A: Artifact>(bytes: &[u8]) -> Result<Container<A>, ContainerError> {
    let header = ContainerHeader::parse(bytes)?;
    let artifact = A::from_bytes(&bytes[HEADER_LEN..])
        .map_err(|e| ContainerError::CorruptPayload { reason: e.reason })?;
    trace!(
        payload_len = bytes.len() - HEADER_LEN,
        source_size = header.source_size,
        "decoded container"
    );
    Ok(Container { header, artifact })
}

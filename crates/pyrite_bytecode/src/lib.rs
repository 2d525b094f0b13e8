//! Compiled artifacts and their on-disk container format.
//!
//! [`lower`] turns an optimized syntax tree into a [`CodeObject`] for the
//! stack machine in `pyrite_vm`. The [`container`] module wraps any
//! [`Artifact`] in a fixed 16-byte header so it can be persisted and later
//! executed without reparsing the source.

#![warn(missing_docs)]

pub mod artifact;
pub mod code;
pub mod container;
pub mod error;
pub mod lower;

pub use artifact::{Artifact, MAX_PAYLOAD_LEN};
pub use code::{CodeObject, Instr};
pub use container::{
    decode, decode_container, encode, Container, ContainerHeader, CONTAINER_MAGIC, HEADER_LEN,
    IMPLEMENTATION_TAG,
};
pub use error::{ContainerError, LowerError, PayloadError};
pub use lower::lower;

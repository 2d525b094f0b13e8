//! Source unit management for the Pyrite compiler.
//!
//! A [`SourceUnit`] is a loaded script together with its content fingerprint
//! and, when it came from disk, the file metadata recorded in container
//! headers.

#![warn(missing_docs)]

pub mod source_unit;

pub use source_unit::{SourceError, SourceStat, SourceUnit};

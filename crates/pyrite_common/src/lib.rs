//! Shared foundational types used across the Pyrite compiler.
//!
//! Currently this is the content [`Fingerprint`] used to key the compilation
//! cache.

#![warn(missing_docs)]

pub mod hash;

pub use hash::Fingerprint;

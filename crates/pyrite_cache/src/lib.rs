//! In-memory compilation cache.
//!
//! Compiled artifacts are keyed by source identifier and content
//! fingerprint, so recompiling unchanged text returns the artifact produced
//! the first time, and editing a file yields a new key rather than
//! overwriting the old entry.

#![warn(missing_docs)]

pub mod cache;
pub mod key;

pub use cache::{CacheStats, CompilationCache};
pub use key::CacheKey;

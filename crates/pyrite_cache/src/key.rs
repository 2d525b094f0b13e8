//! Cache keys.

use std::fmt;

use pyrite_common::Fingerprint;

/// Identifies one compilation: which source, and which version of its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    identifier: String,
    fingerprint: Fingerprint,
}

impl CacheKey {
    /// Builds a key from a source identifier and text fingerprint.
    pub fn new(identifier: impl Into<String>, fingerprint: Fingerprint) -> Self {
        Self {
            identifier: identifier.into(),
            fingerprint,
        }
    }

    /// The source identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The text fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identifier, self.fingerprint)
    }
}

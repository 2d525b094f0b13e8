//! Content fingerprints for compilation cache keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 64-bit fingerprint of source text computed with XXH3.
///
/// Two sources with the same `Fingerprint` are assumed to have identical text.
/// The compilation cache pairs it with the source identifier so that an edited
/// file never resolves to the artifact compiled from its previous contents.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Computes a fingerprint from a byte slice using XXH3-64.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_64(data))
    }

    /// Computes a fingerprint of a string's UTF-8 bytes.
    pub fn of_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Returns the raw 64-bit value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:08x}..)", self.0 >> 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = Fingerprint::of_text("x = 1 + 2");
        let b = Fingerprint::of_text("x = 1 + 2");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = Fingerprint::of_text("x = 1");
        let b = Fingerprint::of_text("x = 2");
        assert_ne!(a, b);
    }

    #[test]
    fn text_and_bytes_agree() {
        assert_eq!(
            Fingerprint::of_text("print(1)"),
            Fingerprint::from_bytes(b"print(1)")
        );
    }

    #[test]
    fn display_format() {
        let h = Fingerprint::of_text("test");
        let s = format!("{h}");
        assert_eq!(s.len(), 16, "Display should be 16 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let s = format!("{:?}", Fingerprint::of_text("test"));
        assert!(s.starts_with("Fingerprint("));
        assert!(s.ends_with("..)"));
    }

    #[test]
    fn serde_roundtrip() {
        let h = Fingerprint::of_text("serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}

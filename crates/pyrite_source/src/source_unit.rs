//! Loaded scripts and their fingerprints.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use pyrite_common::Fingerprint;

/// Errors raised while loading a script from disk.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The script could not be read or its metadata queried.
    #[error("cannot read script {path}: {source}")]
    Io {
        /// The script path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// File metadata captured when a script is loaded from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStat {
    /// Modification time in whole seconds since the Unix epoch.
    pub mtime_secs: u64,
    /// File size in bytes.
    pub size: u64,
}

/// A script loaded into the compiler.
///
/// Immutable once created. The fingerprint is computed eagerly so that cache
/// lookups never rehash the text.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    identifier: String,
    text: String,
    fingerprint: Fingerprint,
    stat: Option<SourceStat>,
}

impl SourceUnit {
    /// Creates a unit from in-memory text under a synthetic identifier
    /// (for example `<string>`).
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let fingerprint = Fingerprint::of_text(&text);
        Self {
            identifier: identifier.into(),
            text,
            fingerprint,
            stat: None,
        }
    }

    /// Reads a script from disk, recording its modification time and size.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let io_err = |source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(io_err)?;
        let meta = std::fs::metadata(path).map_err(io_err)?;
        // Filesystems without mtime support report the epoch.
        let mtime_secs = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut unit = Self::new(path.to_string_lossy().into_owned(), text);
        unit.stat = Some(SourceStat {
            mtime_secs,
            size: meta.len(),
        });
        Ok(unit)
    }

    /// The path or synthetic label identifying this unit.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The full script text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fingerprint of the script text.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// File metadata, present only for units loaded from disk.
    pub fn stat(&self) -> Option<SourceStat> {
        self.stat
    }

    /// Returns `true` if the script contains only whitespace.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl std::fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.identifier, self.fingerprint)
    }
}

//! Failures while resolving a `pyrite.toml`.

use std::path::PathBuf;

/// Why a configuration could not be used.
///
/// Every variant names what the user has to fix: the file that could not be
/// read, the TOML that did not match the `[optimize]`/`[container]` schema, or
/// the container naming field that would produce a bad file name.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    Read {
        /// The file that was requested or discovered.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML, a wrongly typed value, or an unknown key.
    #[error("invalid configuration: {0}")]
    Syntax(String),

    /// A `[container]` field that cannot be used to build a container path.
    #[error("container.{field} {problem}")]
    InvalidContainerField {
        /// Key within the `[container]` table.
        field: &'static str,
        /// What is wrong with its value.
        problem: String,
    },
}

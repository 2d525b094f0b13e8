//! Error types for compilation and pipeline operations.

use std::path::PathBuf;

use pyrite_ast::ParseError;
use pyrite_bytecode::{ContainerError, LowerError};
use pyrite_source::SourceError;

/// A script failed to compile. Nothing is cached in that case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompilerError {
    /// The text is not valid source.
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),

    /// The syntax tree could not be lowered.
    #[error("cannot lower: {0}")]
    Lower(#[from] LowerError),
}

/// Any failure of a pipeline operation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Compilation failed.
    #[error(transparent)]
    Compile(#[from] CompilerError),

    /// A container could not be encoded or decoded.
    #[error("{path}: {source}")]
    Container {
        /// The container file, or the label the bytes were read under.
        path: PathBuf,
        /// The codec error.
        source: ContainerError,
    },

    /// A file could not be read or written.
    #[error("cannot access {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The engine reported a failure while running the program.
    #[error("{0}")]
    Runtime(Box<dyn std::error::Error + Send + Sync>),
}

impl PipelineError {
    /// Display path for [`PipelineError::Container`] and [`PipelineError::Io`].
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            PipelineError::Container { path, .. } | PipelineError::Io { path, .. } => Some(path),
            PipelineError::Compile(_) | PipelineError::Runtime(_) => None,
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Io { path, source } => PipelineError::Io { path, source },
        }
    }
}

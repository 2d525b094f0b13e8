//! Collaborator interfaces plugged into the pipeline.

use pyrite_ast::{Module, ParseError};
use pyrite_bytecode::{Artifact, LowerError};

/// Turns script text into a syntax tree.
pub trait SourceParser {
    /// Parses `text`, reporting errors against `identifier`.
    fn parse(&self, text: &str, identifier: &str) -> Result<Module, ParseError>;
}

/// Turns an optimized syntax tree into an executable artifact.
pub trait Lower {
    /// The compiled form. Must be storable in a container.
    type Artifact: Artifact;

    /// Lowers `module`, recording `identifier` as the artifact's filename.
    fn lower(&self, module: &Module, identifier: &str) -> Result<Self::Artifact, LowerError>;

    /// Post-lowering optimization. The default leaves the artifact unchanged.
    fn peephole(&self, artifact: Self::Artifact) -> Self::Artifact {
        artifact
    }
}

/// Runs an artifact.
pub trait Engine<A> {
    /// What a successful run yields.
    type Output;
    /// What a failed run yields.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes `artifact` in a fresh namespace described by `context`.
    fn execute(&self, artifact: &A, context: &ExecutionContext) -> Result<Self::Output, Self::Error>;
}

/// Identity of the module being executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Bound to `__name__`.
    pub module_name: String,
    /// Bound to `__file__`.
    pub source_identity: String,
}

impl ExecutionContext {
    /// Context for running a script as the main module.
    pub fn main(source_identity: impl Into<String>) -> Self {
        Self {
            module_name: "__main__".to_string(),
            source_identity: source_identity.into(),
        }
    }
}

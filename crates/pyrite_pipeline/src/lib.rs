//! The compilation pipeline controller.
//!
//! [`Pipeline`] drives a script from text to execution: parse, optimize,
//! lower, optionally persist as a container, and run. Parsing, lowering and
//! execution are supplied through the [`SourceParser`], [`Lower`] and
//! [`Engine`] traits; [`StandardPipeline`] wires in the reference
//! implementations from the sibling crates.

#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod traits;

pub use backend::{BytecodeLowering, ReferenceParser, StandardPipeline, VmEngine};
pub use error::{CompilerError, PipelineError};
pub use naming::{container_file_name, container_path};
pub use pipeline::{ContainerHandle, Pipeline};
pub use traits::{Engine, ExecutionContext, Lower, SourceParser};

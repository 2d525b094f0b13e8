//! Reference collaborators: the bundled parser, bytecode lowering and VM.

use pyrite_ast::{Module, ParseError};
use pyrite_bytecode::{CodeObject, LowerError};
use pyrite_config::PyriteConfig;
use pyrite_vm::{RuntimeError, Value, Vm};

use crate::pipeline::Pipeline;
use crate::traits::{Engine, ExecutionContext, Lower, SourceParser};

/// The parser from `pyrite_ast`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceParser;

impl SourceParser for ReferenceParser {
    fn parse(&self, text: &str, identifier: &str) -> Result<Module, ParseError> {
        pyrite_ast::parse(text, identifier)
    }
}

/// Lowering to stack-machine [`CodeObject`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytecodeLowering;

impl Lower for BytecodeLowering {
    type Artifact = CodeObject;

    fn lower(&self, module: &Module, identifier: &str) -> Result<CodeObject, LowerError> {
        pyrite_bytecode::lower(module, identifier)
    }

    fn peephole(&self, artifact: CodeObject) -> CodeObject {
        pyrite_opt::peephole(artifact)
    }
}

/// Executes code objects on a [`Vm`].
#[derive(Debug, Default)]
pub struct VmEngine {
    vm: Vm,
}

impl VmEngine {
    /// Wraps a machine.
    pub fn new(vm: Vm) -> Self {
        Self { vm }
    }

    /// The wrapped machine.
    pub fn vm(&self) -> &Vm {
        &self.vm
    }
}

impl Engine<CodeObject> for VmEngine {
    type Output = Value;
    type Error = RuntimeError;

    fn execute(&self, code: &CodeObject, context: &ExecutionContext) -> Result<Value, RuntimeError> {
        let mut env = self
            .vm
            .environment(&context.module_name, &context.source_identity);
        self.vm.execute(code, &mut env)
    }
}

/// The pipeline assembled from the reference collaborators.
pub type StandardPipeline = Pipeline<ReferenceParser, BytecodeLowering, VmEngine>;

impl StandardPipeline {
    /// A standard pipeline whose programs print to stdout.
    pub fn standard(config: PyriteConfig) -> Self {
        Self::with_vm(config, Vm::new())
    }

    /// A standard pipeline running programs on `vm`.
    pub fn with_vm(config: PyriteConfig, vm: Vm) -> Self {
        Pipeline::new(config, ReferenceParser, BytecodeLowering, VmEngine::new(vm))
    }
}

//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pyrite_ast::{Module, ParseError};
use pyrite_bytecode::{CodeObject, LowerError};
use pyrite_config::PyriteConfig;
use pyrite_pipeline::{
    BytecodeLowering, Lower, Pipeline, ReferenceParser, SourceParser, StandardPipeline, VmEngine,
};
use pyrite_vm::Vm;

/// Program output captured in memory.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    /// Returns everything written so far and clears the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock().unwrap());
        String::from_utf8(bytes).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A shared invocation counter.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// The reference parser, counting calls.
pub struct CountingParser(pub Counter);

impl SourceParser for CountingParser {
    fn parse(&self, text: &str, identifier: &str) -> Result<Module, ParseError> {
        self.0.bump();
        ReferenceParser.parse(text, identifier)
    }
}

/// The reference lowering, counting calls.
pub struct CountingLowering(pub Counter);

impl Lower for CountingLowering {
    type Artifact = CodeObject;

    fn lower(&self, module: &Module, identifier: &str) -> Result<CodeObject, LowerError> {
        self.0.bump();
        BytecodeLowering.lower(module, identifier)
    }
}

pub type CountingPipeline = Pipeline<CountingParser, CountingLowering, VmEngine>;

/// A pipeline with counting front ends and captured output.
pub struct Harness {
    pub pipeline: CountingPipeline,
    pub parses: Counter,
    pub lowerings: Counter,
    pub output: Capture,
}

impl Harness {
    pub fn new(config: PyriteConfig) -> Self {
        let parses = Counter::default();
        let lowerings = Counter::default();
        let output = Capture::default();
        let pipeline = Pipeline::new(
            config,
            CountingParser(parses.clone()),
            CountingLowering(lowerings.clone()),
            VmEngine::new(Vm::with_output(output.clone())),
        );
        Self {
            pipeline,
            parses,
            lowerings,
            output,
        }
    }
}

/// A standard pipeline printing into a capture buffer.
pub fn standard(config: PyriteConfig) -> (StandardPipeline, Capture) {
    let output = Capture::default();
    let pipeline = StandardPipeline::with_vm(config, Vm::with_output(output.clone()));
    (pipeline, output)
}

//! The pipeline controller.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pyrite_bytecode::{decode, encode, ContainerHeader};
use pyrite_cache::{CacheKey, CompilationCache};
use pyrite_config::PyriteConfig;
use pyrite_opt::optimize;
use pyrite_source::SourceUnit;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{CompilerError, PipelineError};
use crate::naming::{container_file_name, container_path};
use crate::traits::{Engine, ExecutionContext, Lower, SourceParser};

/// A container written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    /// Where the container was written.
    pub path: PathBuf,
    /// The header that was written.
    pub header: ContainerHeader,
}

/// Orchestrates compilation, caching, persistence and execution.
///
/// The configuration is fixed at construction. Compiled artifacts are
/// memoized per (identifier, fingerprint) for the lifetime of the pipeline.
pub struct Pipeline<P, L: Lower, E> {
    config: PyriteConfig,
    parser: P,
    lowering: L,
    engine: E,
    cache: CompilationCache<L::Artifact>,
}

impl<P, L: Lower, E> Pipeline<P, L, E> {
    /// Assembles a pipeline from its collaborators.
    pub fn new(config: PyriteConfig, parser: P, lowering: L, engine: E) -> Self {
        Self {
            config,
            parser,
            lowering,
            engine,
            cache: CompilationCache::new(),
        }
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &PyriteConfig {
        &self.config
    }

    /// Read-only access to the compilation cache.
    pub fn cache(&self) -> &CompilationCache<L::Artifact> {
        &self.cache
    }

    /// The execution engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Encodes `artifact` for `unit` and writes it beside the source, in the
    /// configured cache directory.
    pub fn persist(
        &self,
        unit: &SourceUnit,
        artifact: &L::Artifact,
        source_mtime: u64,
        source_size: u64,
    ) -> Result<ContainerHandle, PipelineError> {
        let path = container_path(Path::new(unit.identifier()), &self.config.container);
        self.write_container(path, artifact, source_mtime, source_size)
    }

    /// Like [`persist`](Self::persist), but writes into `dir`.
    pub fn persist_in(
        &self,
        dir: &Path,
        unit: &SourceUnit,
        artifact: &L::Artifact,
        source_mtime: u64,
        source_size: u64,
    ) -> Result<ContainerHandle, PipelineError> {
        let name = container_file_name(Path::new(unit.identifier()), &self.config.container);
        self.write_container(dir.join(name), artifact, source_mtime, source_size)
    }

    /// Writes to a temporary file in the target directory, then renames it
    /// into place, so a reader never observes a partial container.
    fn write_container(
        &self,
        path: PathBuf,
        artifact: &L::Artifact,
        source_mtime: u64,
        source_size: u64,
    ) -> Result<ContainerHandle, PipelineError> {
        let bytes = encode(artifact, source_mtime, source_size).map_err(|source| {
            PipelineError::Container {
                path: path.clone(),
                source,
            }
        })?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| PipelineError::Io { path, source }
        };
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err(&dir))?;
        tmp.write_all(&bytes).map_err(io_err(tmp.path()))?;
        tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;
        tmp.persist(&path).map_err(|e| PipelineError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        info!(path = %path.display(), bytes = bytes.len(), "wrote container");
        Ok(ContainerHandle {
            path,
            header: ContainerHeader::new(source_mtime, source_size),
        })
    }
}

impl<P: SourceParser, L: Lower, E> Pipeline<P, L, E> {
    /// Compiles `unit`, returning the cached artifact when the same
    /// identifier and text were compiled before.
    ///
    /// The cache is consulted before parsing. On a miss the text is parsed,
    /// optimized per the configuration, lowered and peephole-optimized, and
    /// the result is cached. A failure caches nothing.
    pub fn compile_source(&self, unit: &SourceUnit) -> Result<Arc<L::Artifact>, CompilerError> {
        let key = CacheKey::new(unit.identifier(), unit.fingerprint());
        self.cache.get_or_try_insert_with(&key, || self.build(unit))
    }

    fn build(&self, unit: &SourceUnit) -> Result<L::Artifact, CompilerError> {
        let options = &self.config.optimize;
        let module = self.parser.parse(unit.text(), unit.identifier())?;
        let module = optimize(module, options);
        let artifact = self.lowering.lower(&module, unit.identifier())?;
        let artifact = if options.peephole {
            self.lowering.peephole(artifact)
        } else {
            artifact
        };
        debug!(identifier = unit.identifier(), "compiled source");
        Ok(artifact)
    }

    /// Loads, compiles and persists the script at `path`, recording its
    /// modification time and size in the container header.
    pub fn compile_file(&self, path: &Path) -> Result<ContainerHandle, PipelineError> {
        let (unit, artifact) = self.load_and_compile(path)?;
        let (mtime, size) = stat_of(&unit);
        self.persist(&unit, &artifact, mtime, size)
    }

    /// Like [`compile_file`](Self::compile_file), but writes into `dir`.
    pub fn compile_file_in(&self, path: &Path, dir: &Path) -> Result<ContainerHandle, PipelineError> {
        let (unit, artifact) = self.load_and_compile(path)?;
        let (mtime, size) = stat_of(&unit);
        self.persist_in(dir, &unit, &artifact, mtime, size)
    }

    fn load_and_compile(&self, path: &Path) -> Result<(SourceUnit, Arc<L::Artifact>), PipelineError> {
        let unit = SourceUnit::load(path)?;
        let artifact = self.compile_source(&unit)?;
        Ok((unit, artifact))
    }
}

impl<P, L, E> Pipeline<P, L, E>
where
    L: Lower,
    E: Engine<L::Artifact>,
{
    /// Decodes a container and executes it. The parser, optimizer and cache
    /// are not involved; `origin` names the bytes in errors and is bound to
    /// `__file__`.
    pub fn run_from_container(&self, bytes: &[u8], origin: &Path) -> Result<E::Output, PipelineError> {
        let artifact: L::Artifact = decode(bytes).map_err(|source| PipelineError::Container {
            path: origin.to_path_buf(),
            source,
        })?;
        debug!(origin = %origin.display(), "running container");
        self.execute(&artifact, origin.to_string_lossy().into_owned())
    }

    /// Reads the container at `path` and executes it.
    pub fn run_container_file(&self, path: &Path) -> Result<E::Output, PipelineError> {
        let bytes = fs::read(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.run_from_container(&bytes, path)
    }

    fn execute(&self, artifact: &L::Artifact, identity: String) -> Result<E::Output, PipelineError> {
        self.engine
            .execute(artifact, &ExecutionContext::main(identity))
            .map_err(|e| PipelineError::Runtime(Box::new(e)))
    }
}

impl<P, L, E> Pipeline<P, L, E>
where
    P: SourceParser,
    L: Lower,
    E: Engine<L::Artifact>,
{
    /// Compiles (or fetches from cache) and executes `unit` as `__main__`.
    pub fn run_from_source(&self, unit: &SourceUnit) -> Result<E::Output, PipelineError> {
        let artifact = self.compile_source(unit)?;
        self.execute(&artifact, unit.identifier().to_string())
    }

    /// Loads and runs the script at `path`.
    pub fn run_file(&self, path: &Path) -> Result<E::Output, PipelineError> {
        let unit = SourceUnit::load(path)?;
        self.run_from_source(&unit)
    }
}

fn stat_of(unit: &SourceUnit) -> (u64, u64) {
    unit.stat()
        .map_or((0, unit.text().len() as u64), |s| (s.mtime_secs, s.size))
}

mod common;

use std::fs;

use pyrite_bytecode::{ContainerError, CONTAINER_MAGIC, HEADER_LEN, IMPLEMENTATION_TAG};
use pyrite_config::PyriteConfig;
use pyrite_pipeline::PipelineError;
use pyrite_source::SourceUnit;

use common::{standard, Harness};

const SCRIPT: &str = "greeting = 'hello'\nn = 6 * 7\nprint(greeting, n, n / 4)\n";

#[test]
fn compiled_file_runs_like_its_source() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("greet.py");
    fs::write(&script, SCRIPT).unwrap();
    let (pipeline, output) = standard(PyriteConfig::default());

    let handle = pipeline.compile_file(&script).unwrap();
    assert_eq!(
        handle.path,
        dir.path()
            .join("__pycache__")
            .join(format!("greet.{IMPLEMENTATION_TAG}.pyc"))
    );
    assert_eq!(handle.header.source_size as usize, SCRIPT.len());

    let bytes = fs::read(&handle.path).unwrap();
    assert_eq!(bytes[..4], CONTAINER_MAGIC);
    assert_eq!(bytes[8..12], (SCRIPT.len() as u32).to_le_bytes());
    assert_eq!(bytes[12..16], [0, 0, 0, 0]);

    pipeline.run_file(&script).unwrap();
    let from_source = output.take();
    pipeline.run_container_file(&handle.path).unwrap();
    let from_container = output.take();

    assert_eq!(from_source, "hello 42 10.5\n");
    assert_eq!(from_container, from_source);
}

#[test]
fn output_dir_overrides_cache_location() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let script = dir.path().join("m.py");
    fs::write(&script, "print(1)").unwrap();
    let (pipeline, _) = standard(PyriteConfig::default());

    let handle = pipeline.compile_file_in(&script, out.path()).unwrap();
    assert_eq!(handle.path.parent(), Some(out.path()));
    assert!(!dir.path().join("__pycache__").exists());
}

#[test]
fn recompiling_overwrites_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("m.py");
    let (pipeline, output) = standard(PyriteConfig::default());

    fs::write(&script, "print('one')").unwrap();
    let first = pipeline.compile_file(&script).unwrap();
    fs::write(&script, "print('two')").unwrap();
    let second = pipeline.compile_file(&script).unwrap();

    assert_eq!(first.path, second.path);
    pipeline.run_container_file(&second.path).unwrap();
    assert_eq!(output.take(), "two\n");
    let leftovers = fs::read_dir(first.path.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn running_a_container_bypasses_parser_and_cache() {
    let writer = Harness::new(PyriteConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let unit = SourceUnit::new("prog.py", "print(__name__, 2 + 2)");
    let code = writer.pipeline.compile_source(&unit).unwrap();
    let handle = writer
        .pipeline
        .persist_in(dir.path(), &unit, &code, 0, 0)
        .unwrap();

    let reader = Harness::new(PyriteConfig::default());
    reader.pipeline.run_container_file(&handle.path).unwrap();

    assert_eq!(reader.output.take(), "__main__ 4\n");
    assert_eq!(reader.parses.get(), 0);
    assert_eq!(reader.lowerings.get(), 0);
    assert!(reader.pipeline.cache().is_empty());
}

#[test]
fn container_binds_its_own_path_as_file() {
    let (pipeline, output) = standard(PyriteConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let unit = SourceUnit::new("prog.py", "print(__file__)");
    let code = pipeline.compile_source(&unit).unwrap();
    let handle = pipeline.persist_in(dir.path(), &unit, &code, 0, 0).unwrap();

    pipeline.run_container_file(&handle.path).unwrap();
    assert_eq!(output.take(), format!("{}\n", handle.path.display()));
}

#[test]
fn metadata_is_masked_to_32_bits() {
    let (pipeline, _) = standard(PyriteConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let unit = SourceUnit::new("big.py", "x = 1");
    let code = pipeline.compile_source(&unit).unwrap();

    let handle = pipeline
        .persist_in(dir.path(), &unit, &code, (1u64 << 32) + 9, (1u64 << 32) + 5)
        .unwrap();

    assert_eq!(handle.header.source_size, 5);
    assert_eq!(handle.header.source_mtime, 9);
    let bytes = fs::read(&handle.path).unwrap();
    assert_eq!(bytes[4..8], 9u32.to_le_bytes());
    assert_eq!(bytes[8..12], 5u32.to_le_bytes());
}

fn run_bytes(name: &str, bytes: &[u8]) -> PipelineError {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    let (pipeline, _) = standard(PyriteConfig::default());
    let err = pipeline.run_container_file(&path).unwrap_err();
    assert_eq!(err.path(), Some(path.as_path()));
    err
}

#[test]
fn wrong_magic_is_rejected_with_path() {
    let mut bytes = vec![0x42, 0x0D, 0x0D, 0x0A];
    bytes.extend_from_slice(&[0u8; 64]);
    let err = run_bytes("foreign.pyc", &bytes);
    assert!(matches!(
        err,
        PipelineError::Container {
            source: ContainerError::InvalidMagic { ref found },
            ..
        } if found == &[0x42, 0x0D, 0x0D, 0x0A]
    ));
    assert!(err.to_string().contains("foreign.pyc"));
}

#[test]
fn empty_and_short_files_are_invalid_magic() {
    for bytes in [&[][..], &CONTAINER_MAGIC[..3]] {
        let err = run_bytes("short.pyc", bytes);
        assert!(matches!(
            err,
            PipelineError::Container {
                source: ContainerError::InvalidMagic { .. },
                ..
            }
        ));
    }
}

#[test]
fn truncated_header_is_corrupt() {
    let mut bytes = CONTAINER_MAGIC.to_vec();
    bytes.extend_from_slice(&[0u8; 4]);
    assert!(bytes.len() < HEADER_LEN);
    let err = run_bytes("trunc.pyc", &bytes);
    assert!(matches!(
        err,
        PipelineError::Container {
            source: ContainerError::CorruptPayload { .. },
            ..
        }
    ));
}

#[test]
fn damaged_payload_is_corrupt() {
    let (pipeline, _) = standard(PyriteConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let unit = SourceUnit::new("ok.py", "print('fine')");
    let code = pipeline.compile_source(&unit).unwrap();
    let handle = pipeline.persist_in(dir.path(), &unit, &code, 0, 0).unwrap();

    let mut bytes = fs::read(&handle.path).unwrap();
    bytes.truncate(bytes.len() - 1);
    let err = run_bytes("cut.pyc", &bytes);
    assert!(matches!(
        err,
        PipelineError::Container {
            source: ContainerError::CorruptPayload { .. },
            ..
        }
    ));

    let mut bytes = fs::read(&handle.path).unwrap();
    bytes.push(0);
    let err = run_bytes("padded.pyc", &bytes);
    assert!(matches!(
        err,
        PipelineError::Container {
            source: ContainerError::CorruptPayload { .. },
            ..
        }
    ));
}

#[test]
fn oversized_length_prefix_is_corrupt() {
    let mut bytes = CONTAINER_MAGIC.to_vec();
    bytes.extend_from_slice(&[0u8; HEADER_LEN - 4]);
    bytes.push(0xFD);
    bytes.extend_from_slice(&(1u64 << 40).to_le_bytes());

    let err = run_bytes("forged.pyc", &bytes);
    assert!(matches!(
        err,
        PipelineError::Container {
            source: ContainerError::CorruptPayload { .. },
            ..
        }
    ));
}

#[test]
fn missing_container_is_an_io_error() {
    let (pipeline, _) = standard(PyriteConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.pyc");
    let err = pipeline.run_container_file(&path).unwrap_err();
    assert!(matches!(err, PipelineError::Io { path: ref p, .. } if p == &path));
}

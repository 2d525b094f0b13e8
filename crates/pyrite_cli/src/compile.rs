//! `pyrite compile` and `pyrite dis`.

use std::path::Path;

use pyrite_pipeline::ContainerHandle;
use pyrite_source::SourceUnit;

use crate::session;
use crate::{CompileArgs, GlobalArgs, ReportFormat};

/// Compiles a script and writes its container. Prints where it went.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let script = Path::new(&args.script);
    let pipeline = session::pipeline(global, script)?;
    let handle = match args.output_dir {
        Some(ref dir) => pipeline.compile_file_in(script, Path::new(dir))?,
        None => pipeline.compile_file(script)?,
    };
    println!("{}", report(&args.script, &handle, args.format)?);
    Ok(0)
}

fn report(
    script: &str,
    handle: &ContainerHandle,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(handle.path.display().to_string()),
        ReportFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "source": script,
            "container": handle.path.to_string_lossy(),
            "source_mtime": handle.header.source_mtime,
            "source_size": handle.header.source_size,
        })),
    }
}

/// Prints the bytecode a script compiles to.
pub fn disassemble(script: &str, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = Path::new(script);
    let pipeline = session::pipeline(global, path)?;
    let unit = SourceUnit::load(path)?;
    let code = pipeline.compile_source(&unit)?;
    print!("{code}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyrite_bytecode::ContainerHeader;
    use std::fs;
    use std::path::PathBuf;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn json_report_fields() {
        let handle = ContainerHandle {
            path: PathBuf::from("out/a.pyrite-01.pyc"),
            header: ContainerHeader::new(100, 12),
        };
        let text = report("a.py", &handle, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["source"], "a.py");
        assert_eq!(value["container"], "out/a.pyrite-01.pyc");
        assert_eq!(value["source_mtime"], 100);
        assert_eq!(value["source_size"], 12);
    }

    #[test]
    fn text_report_is_the_path() {
        let handle = ContainerHandle {
            path: PathBuf::from("a.pyc"),
            header: ContainerHeader::new(0, 0),
        };
        assert_eq!(report("a.py", &handle, ReportFormat::Text).unwrap(), "a.pyc");
    }

    #[test]
    fn compile_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("build");
        let script = dir.path().join("a.py");
        fs::write(&script, "x = 1").unwrap();
        let args = CompileArgs {
            script: script.to_string_lossy().into_owned(),
            output_dir: Some(out.to_string_lossy().into_owned()),
            format: ReportFormat::Text,
        };

        assert_eq!(run(&args, &global()).unwrap(), 0);
        let written: Vec<_> = fs::read_dir(&out).unwrap().collect();
        assert_eq!(written.len(), 1);
    }
}

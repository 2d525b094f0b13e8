//! `pyrite run` and `pyrite exec`.

use std::path::Path;

use pyrite_source::SourceUnit;
use tracing::info;

use crate::session;
use crate::GlobalArgs;

/// Compiles and runs a script. Returns the process exit code.
pub fn run_script(script: &str, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = Path::new(script);
    let pipeline = session::pipeline(global, path)?;
    let unit = SourceUnit::load(path)?;
    pipeline.run_from_source(&unit)?;
    info!(script, "finished");
    Ok(0)
}

/// Runs a bytecode container. Returns the process exit code.
pub fn run_container(
    container: &str,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let path = Path::new(container);
    let pipeline = session::pipeline(global, path)?;
    pipeline.run_container_file(path)?;
    info!(container, "finished");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn missing_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("missing.py");
        let err = run_script(&script.to_string_lossy(), &global()).unwrap_err();
        assert!(err.to_string().contains("missing.py"));
    }

    #[test]
    fn syntax_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("bad.py");
        fs::write(&script, "x = (").unwrap();
        let err = run_script(&script.to_string_lossy(), &global()).unwrap_err();
        assert!(err.to_string().starts_with("syntax error:"));
    }

    #[test]
    fn foreign_container_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let container = dir.path().join("x.pyc");
        fs::write(&container, b"not a container").unwrap();
        let err = run_container(&container.to_string_lossy(), &global()).unwrap_err();
        assert!(err.to_string().contains("invalid container magic"));
    }

    #[test]
    fn deeply_nested_script_is_a_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("deep.py");
        fs::write(&script, format!("x = {}1{}\n", "(".repeat(50_000), ")".repeat(50_000))).unwrap();
        let err = run_script(&script.to_string_lossy(), &global()).unwrap_err();
        assert!(err.to_string().contains("too many nested parentheses"));
    }

    #[test]
    fn silent_script_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ok.py");
        fs::write(&script, "x = 1 + 2\ny = x * 3\n").unwrap();
        assert_eq!(run_script(&script.to_string_lossy(), &global()).unwrap(), 0);
    }
}

//! Shared setup for CLI commands: configuration lookup and pipeline assembly.

use std::path::{Path, PathBuf};

use pyrite_config::{resolve_config, PyriteConfig};
use pyrite_pipeline::StandardPipeline;
use tracing::debug;

use crate::GlobalArgs;

/// Resolves the configuration for a command operating on `target`.
///
/// `--config` wins. Otherwise `pyrite.toml` is searched for upwards from the
/// target's directory, falling back to the defaults.
pub fn load_config(
    global: &GlobalArgs,
    target: &Path,
) -> Result<PyriteConfig, Box<dyn std::error::Error>> {
    let explicit = global.config.as_deref().map(Path::new);
    let start = search_start(target)?;
    let config = resolve_config(explicit, &start)?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn search_start(target: &Path) -> Result<PathBuf, std::io::Error> {
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.to_path_buf()),
        _ => std::env::current_dir(),
    }
}

/// Builds a pipeline whose programs print to stdout.
pub fn pipeline(
    global: &GlobalArgs,
    target: &Path,
) -> Result<StandardPipeline, Box<dyn std::error::Error>> {
    Ok(StandardPipeline::standard(load_config(global, target)?))
}

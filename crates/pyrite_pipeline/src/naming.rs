//! Container file naming: `<dir>/<cache_dir>/<stem>.<tag>.<extension>`.

use std::path::{Path, PathBuf};

use pyrite_bytecode::IMPLEMENTATION_TAG;
use pyrite_config::ContainerConfig;

/// Stem used when the source path has none (for example `<string>`).
const FALLBACK_STEM: &str = "module";

/// File name of the container for `source`, without any directory.
pub fn container_file_name(source: &Path, config: &ContainerConfig) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .filter(|s| !s.is_empty() && !s.starts_with('<'))
        .unwrap_or(FALLBACK_STEM.into());
    let tag = config.tag.as_deref().unwrap_or(IMPLEMENTATION_TAG);
    format!("{stem}.{tag}.{}", config.extension)
}

/// Path of the container for `source`, in the cache directory beside it.
pub fn container_path(source: &Path, config: &ContainerConfig) -> PathBuf {
    let dir = source.parent().unwrap_or(Path::new(""));
    dir.join(&config.cache_dir)
        .join(container_file_name(source, config))
}

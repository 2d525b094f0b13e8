//! Configuration file discovery, loading and validation.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::{ContainerConfig, PyriteConfig};

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "pyrite.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<PyriteConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PyriteConfig, ConfigError> {
    let config: PyriteConfig =
        toml::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?;
    validate_container(&config.container)?;
    Ok(config)
}

/// Walks up from `start` looking for the nearest `pyrite.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Resolves the effective configuration.
///
/// An explicit path must exist. Otherwise the nearest `pyrite.toml` above
/// `start` is used, and defaults apply when none is found.
pub fn resolve_config(
    explicit: Option<&Path>,
    start: &Path,
) -> Result<PyriteConfig, ConfigError> {
    match explicit {
        Some(path) => load_config(path),
        None => match find_config(start) {
            Some(path) => load_config(&path),
            None => Ok(PyriteConfig::default()),
        },
    }
}

/// Container names are built from these fields, so none may be empty or
/// contain path separators.
fn validate_container(container: &ContainerConfig) -> Result<(), ConfigError> {
    let invalid = |field, problem: String| ConfigError::InvalidContainerField { field, problem };
    let mut fields = vec![
        ("cache_dir", container.cache_dir.as_str()),
        ("extension", container.extension.as_str()),
    ];
    if let Some(tag) = &container.tag {
        fields.push(("tag", tag.as_str()));
    }
    for (field, value) in fields {
        if value.is_empty() {
            return Err(invalid(field, "is empty".to_string()));
        }
        if value.contains(['/', '\\']) {
            return Err(invalid(
                field,
                format!("must not contain path separators: '{value}'"),
            ));
        }
    }
    if container.extension.starts_with('.') {
        return Err(invalid(
            "extension",
            format!("must not start with '.': '{}'", container.extension),
        ));
    }
    Ok(())
}

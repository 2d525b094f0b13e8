//! Configuration types deserialized from `pyrite.toml`.

use serde::{Deserialize, Serialize};

/// The top-level compiler configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PyriteConfig {
    /// Which optimization passes run.
    pub optimize: OptimizationConfig,
    /// Where and under what name compiled containers are written.
    pub container: ContainerConfig,
}

/// Optimization switches, consumed once per pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizationConfig {
    /// Fold binary arithmetic over two literal operands (single level).
    pub constant_folding: bool,
    /// Run the bytecode peephole pass. Currently an identity transform.
    pub peephole: bool,
    /// Opt-in recursive bottom-up folding of nested literal arithmetic.
    pub deep_folding: bool,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            constant_folding: true,
            peephole: true,
            deep_folding: false,
        }
    }
}

impl OptimizationConfig {
    /// A configuration with every pass disabled.
    pub fn none() -> Self {
        Self {
            constant_folding: false,
            peephole: false,
            deep_folding: false,
        }
    }
}

/// Naming rules for persisted containers:
/// `<dir beside source>/<cache_dir>/<stem>.<tag>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Name of the cache subdirectory created next to the source file.
    pub cache_dir: String,
    /// File extension, without the leading dot.
    pub extension: String,
    /// Implementation tag; `None` uses the compiler's built-in tag.
    pub tag: Option<String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            cache_dir: "__pycache__".to_string(),
            extension: "pyc".to_string(),
            tag: None,
        }
    }
}

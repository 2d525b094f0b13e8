//! Parsing and validation of `pyrite.toml` compiler configuration files.
//!
//! Every field has a default, so a missing file is equivalent to an empty one.
//! The resulting [`PyriteConfig`] carries the [`OptimizationConfig`] consumed by
//! the optimizer and the [`ContainerConfig`] naming rules for persisted
//! containers.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, resolve_config, CONFIG_FILE_NAME};
pub use types::*;

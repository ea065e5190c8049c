//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Example configuration written by `chromatone init`
pub const EXAMPLE_CONFIG: &str = include_str!("../../chromatone.example.yaml");

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<ChromatoneConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {:?}", path))?;
    let config: ChromatoneConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_or_default(path: &Path) -> Result<ChromatoneConfig> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(?path, "config file not found, using defaults");
        Ok(ChromatoneConfig::default())
    }
}

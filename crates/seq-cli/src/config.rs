use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use seq_core::SearchConfig;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "SEQNEXT_CONFIG";

/// Contents of a `seqnext` TOML file. Every table is optional.
///
/// ```toml
/// [search]
/// depth_limit = 40
/// session_familiarity = 3
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub search: SearchConfig,
}

impl CliConfig {
    /// Load from `--config`, else from `SEQNEXT_CONFIG`, else defaults.
    ///
    /// A path that was named explicitly must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit.map(Path::to_path_buf).or_else(|| {
            std::env::var(CONFIG_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(
            depth_limit = config.search.depth_limit,
            "loaded config from {}",
            path.display()
        );
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

//! Stage configuration loader.

use std::path::Path;

use stage_core::StageConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for stage configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`StageConfig::default`].
    pub fn load(path: &Path) -> LoadResult<StageConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StageConfig> {
        let config: StageConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        tracing::debug!(
            "loaded stage config: seed {}, {} distant tile tries, fov radius {}",
            config.seed,
            config.distant_tile_tries,
            config.fov_radius
        );
        Ok(config)
    }
}

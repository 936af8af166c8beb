//! Content loaders for reading stage data from files.
//!
//! Every loader has a `load(path)` entry point and a `parse(str)` variant
//! for embedded or in-memory data.

pub mod config;
pub mod layout;
pub mod terrain;

pub use config::ConfigLoader;
pub use layout::{LayoutLoader, StageLayout};
pub use terrain::{FlagSpec, TerrainLoader, TerrainSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

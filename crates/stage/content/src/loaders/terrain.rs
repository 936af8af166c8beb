//! Terrain catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stage_core::{TerrainCatalog, TerrainFlags, TerrainType};

use crate::loaders::{LoadResult, read_file};

/// Default terrain set shipped with the crate.
const BUILTIN_TERRAIN: &str = include_str!("../../data/terrain.ron");

/// Movement and sight capabilities as written in data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagSpec {
    Walkable,
    Flyable,
    Exit,
}

impl From<FlagSpec> for TerrainFlags {
    fn from(flag: FlagSpec) -> Self {
        match flag {
            FlagSpec::Walkable => TerrainFlags::WALKABLE,
            FlagSpec::Flyable => TerrainFlags::FLYABLE,
            FlagSpec::Exit => TerrainFlags::EXIT,
        }
    }
}

/// One terrain definition. Door partners are referenced by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSpec {
    pub name: String,
    pub glyph: char,
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
    #[serde(default)]
    pub opens_to: Option<String>,
}

/// Terrain set structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TerrainSetRon {
    terrain: Vec<TerrainSpec>,
}

/// Loader for terrain catalogs from RON files.
pub struct TerrainLoader;

impl TerrainLoader {
    /// Load a terrain catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing the terrain set
    ///
    /// # Returns
    ///
    /// Returns a catalog with every door pair linked in both directions.
    pub fn load(path: &Path) -> LoadResult<TerrainCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// The embedded default terrain set.
    pub fn builtin() -> LoadResult<TerrainCatalog> {
        Self::parse(BUILTIN_TERRAIN)
    }

    pub fn parse(content: &str) -> LoadResult<TerrainCatalog> {
        let data: TerrainSetRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse terrain RON: {}", e))?;
        Self::build(&data.terrain)
    }

    /// Registers every definition, then links door pairs once all names are known.
    pub fn build(definitions: &[TerrainSpec]) -> LoadResult<TerrainCatalog> {
        let mut catalog = TerrainCatalog::new();

        for def in definitions {
            let flags = def
                .flags
                .iter()
                .fold(TerrainFlags::empty(), |acc, &flag| acc | TerrainFlags::from(flag));
            catalog
                .register(TerrainType::new(def.name.clone(), def.glyph, flags))
                .map_err(|e| anyhow::anyhow!("Invalid terrain '{}': {}", def.name, e))?;
        }

        for def in definitions {
            let Some(open_name) = &def.opens_to else {
                continue;
            };
            let closed = catalog
                .id_of(&def.name)
                .ok_or_else(|| anyhow::anyhow!("Unknown terrain '{}'", def.name))?;
            let open = catalog.id_of(open_name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Terrain '{}' opens to unknown terrain '{}'",
                    def.name,
                    open_name
                )
            })?;
            catalog
                .link_door(closed, open)
                .map_err(|e| anyhow::anyhow!("Invalid door '{}': {}", def.name, e))?;
        }

        tracing::debug!("loaded terrain catalog with {} kinds", catalog.len());
        Ok(catalog)
    }
}

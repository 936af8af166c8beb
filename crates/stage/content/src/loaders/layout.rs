//! Stage layout loader.
//!
//! Layouts draw terrain as rows of glyphs; a legend maps each glyph to a
//! terrain name from the catalog the stage is built with.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stage_core::{Position, Stage, StageConfig, TerrainCatalog, TerrainId};

use crate::loaders::{LoadResult, read_file};

/// Layout structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageLayout {
    /// Declared `(width, height)`; derived from the rows when omitted.
    #[serde(default)]
    pub dimensions: Option<(u32, u32)>,
    pub legend: BTreeMap<char, String>,
    pub rows: Vec<String>,
}

impl StageLayout {
    /// Width and height of the drawn rows.
    ///
    /// Every row must have the same length, and both must agree with the
    /// declared dimensions when present.
    pub fn dimensions(&self) -> LoadResult<(u32, u32)> {
        let height = self.rows.len();
        let width = self.rows.first().map_or(0, |row| row.chars().count());
        if width == 0 || height == 0 {
            anyhow::bail!("Layout has no cells");
        }

        for (y, row) in self.rows.iter().enumerate() {
            let len = row.chars().count();
            if len != width {
                anyhow::bail!("Layout row {} has {} cells, expected {}", y, len, width);
            }
        }

        let drawn = (u32::try_from(width)?, u32::try_from(height)?);
        if let Some(declared) = self.dimensions.filter(|&declared| declared != drawn) {
            anyhow::bail!(
                "Layout declares {}x{} but rows draw {}x{}",
                declared.0,
                declared.1,
                drawn.0,
                drawn.1
            );
        }
        Ok(drawn)
    }

    /// Resolves the legend against `catalog`.
    fn resolve_legend(&self, catalog: &TerrainCatalog) -> LoadResult<BTreeMap<char, TerrainId>> {
        self.legend
            .iter()
            .map(|(&glyph, name)| {
                catalog
                    .id_of(name)
                    .map(|id| (glyph, id))
                    .ok_or_else(|| {
                        anyhow::anyhow!("Legend '{}' names unknown terrain '{}'", glyph, name)
                    })
            })
            .collect()
    }

    /// Builds a fresh stage with this layout's terrain applied.
    ///
    /// The stage is not sealed; callers place entities and call
    /// `finish_build` themselves.
    pub fn build(&self, catalog: Arc<TerrainCatalog>, config: StageConfig) -> LoadResult<Stage> {
        let (width, height) = self.dimensions()?;
        let legend = self.resolve_legend(&catalog)?;
        let mut stage = Stage::new(width, height, catalog, config);

        for (y, row) in self.rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let terrain = legend.get(&glyph).copied().ok_or_else(|| {
                    anyhow::anyhow!("Glyph '{}' at ({}, {}) is not in the legend", glyph, x, y)
                })?;
                stage.set_terrain(Position::new(x as i32, y as i32), terrain);
            }
        }

        tracing::debug!("applied {}x{} layout", width, height);
        Ok(stage)
    }

    /// Every position drawn with `glyph`, row-major.
    pub fn positions_of(&self, glyph: char) -> Vec<Position> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.chars()
                    .enumerate()
                    .filter(move |&(_, c)| c == glyph)
                    .map(move |(x, _)| Position::new(x as i32, y as i32))
            })
            .collect()
    }
}

/// Loader for stage layouts from RON files.
pub struct LayoutLoader;

impl LayoutLoader {
    /// Load a layout from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing the layout
    ///
    /// # Returns
    ///
    /// Returns the layout after checking that its rows are rectangular.
    pub fn load(path: &Path) -> LoadResult<StageLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StageLayout> {
        let layout: StageLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse layout RON: {}", e))?;
        layout.dimensions()?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::TerrainLoader;
    use stage_core::{RaycastFov, StageEnv};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROOM: &str = r########"(
        legend: {'#': "wall", '.': "floor", '+': "closed_door", '>': "stairs"},
        rows: [
            "#######",
            "#..#..#",
            "#..+.>#",
            "#..#..#",
            "#######",
        ],
    )"########;

    #[test]
    fn test_build_stage_from_layout() {
        let catalog = Arc::new(TerrainLoader::builtin().unwrap());
        let layout = LayoutLoader::parse(ROOM).unwrap();
        let mut stage = layout.build(catalog, StageConfig::default()).unwrap();

        assert_eq!((stage.width(), stage.height()), (7, 5));
        assert!(!stage.is_walkable(Position::new(0, 0)));
        assert!(stage.is_walkable(Position::new(1, 1)));
        assert!(!stage.is_walkable(Position::new(3, 2)));
        assert!(stage.is_exit(Position::new(5, 2)));

        let fov = RaycastFov::default();
        let env = StageEnv::reference(&fov);
        // Every interior cell, including the dividing wall around the door.
        assert_eq!(stage.finish_build(Position::new(1, 1), &env).unwrap(), 15);
        assert!(stage.open_door(Position::new(3, 2)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", ROOM).unwrap();

        let layout = LayoutLoader::load(file.path()).unwrap();
        assert_eq!(layout.dimensions().unwrap(), (7, 5));
        assert_eq!(layout.positions_of('>'), vec![Position::new(5, 2)]);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = LayoutLoader::parse(r#"(legend: {'.': "floor"}, rows: ["...", ".."])"#)
            .unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_declared_dimensions_must_match() {
        let err = LayoutLoader::parse(
            r#"(dimensions: Some((4, 1)), legend: {'.': "floor"}, rows: ["..."])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("declares 4x1"));
    }

    #[test]
    fn test_unknown_glyph_and_terrain_are_errors() {
        let catalog = Arc::new(TerrainLoader::builtin().unwrap());

        let layout = LayoutLoader::parse(r#"(legend: {'.': "floor"}, rows: [".x."])"#).unwrap();
        let err = layout
            .build(Arc::clone(&catalog), StageConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("'x'"));

        let layout = LayoutLoader::parse(r#"(legend: {'.': "lava"}, rows: ["..."])"#).unwrap();
        let err = layout.build(catalog, StageConfig::default()).unwrap_err();
        assert!(err.to_string().contains("lava"));
    }
}

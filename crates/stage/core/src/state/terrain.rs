//! Immutable terrain descriptors shared by many cells.
//!
//! Cells store a [`TerrainId`] handle; the descriptors themselves live in a
//! [`TerrainCatalog`] that is built once and then shared read-only.

use std::collections::HashMap;
use std::ops::Index;

use bitflags::bitflags;

use crate::error::{ErrorSeverity, StageFault};

bitflags! {
    /// Movement and exit capabilities of a terrain kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TerrainFlags: u8 {
        const WALKABLE = 0b0000_0001;
        const FLYABLE  = 0b0000_0010;
        const EXIT     = 0b0000_0100;
    }
}

/// Handle into a [`TerrainCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainId(pub u16);

impl TerrainId {
    /// Placeholder terrain filling a freshly constructed grid.
    pub const UNFORMED: Self = Self(0);

    #[inline]
    fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Immutable descriptor for a kind of cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainType {
    pub name: String,
    pub glyph: char,
    pub flags: TerrainFlags,
    /// Terrain this one becomes when opened (closed door → open door).
    pub opens_to: Option<TerrainId>,
    /// Terrain this one becomes when closed (open door → closed door).
    pub closes_to: Option<TerrainId>,
}

impl TerrainType {
    pub fn new(name: impl Into<String>, glyph: char, flags: TerrainFlags) -> Self {
        Self {
            name: name.into(),
            glyph,
            flags,
            opens_to: None,
            closes_to: None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.flags.contains(TerrainFlags::WALKABLE)
    }

    pub fn is_flyable(&self) -> bool {
        self.flags.contains(TerrainFlags::FLYABLE)
    }

    pub fn is_exit(&self) -> bool {
        self.flags.contains(TerrainFlags::EXIT)
    }

    /// Light passes wherever a flier could.
    pub fn is_transparent(&self) -> bool {
        self.is_flyable()
    }

    /// Walkable now, or can be made walkable by opening it.
    pub fn is_traversable(&self) -> bool {
        self.is_walkable() || self.opens_to.is_some()
    }
}

/// Errors raised while assembling a terrain catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("terrain {0:?} is not registered in this catalog")]
    UnknownTerrain(TerrainId),

    #[error("terrain name '{0}' is already registered")]
    DuplicateName(String),

    #[error("a terrain cannot open to itself ({0:?})")]
    SelfTransition(TerrainId),

    #[error("terrain catalog is full")]
    CatalogFull,
}

impl StageFault for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::UnknownTerrain(_) => "CATALOG_UNKNOWN_TERRAIN",
            CatalogError::DuplicateName(_) => "CATALOG_DUPLICATE_NAME",
            CatalogError::SelfTransition(_) => "CATALOG_SELF_TRANSITION",
            CatalogError::CatalogFull => "CATALOG_FULL",
        }
    }
}

/// Registry of every terrain kind a stage may use.
///
/// Index 0 is always [`TerrainId::UNFORMED`]: neither walkable nor flyable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainCatalog {
    types: Vec<TerrainType>,
    by_name: HashMap<String, TerrainId>,
}

impl TerrainCatalog {
    pub const UNFORMED_NAME: &'static str = "unformed";

    pub fn new() -> Self {
        let unformed = TerrainType::new(Self::UNFORMED_NAME, ' ', TerrainFlags::empty());
        let mut by_name = HashMap::new();
        by_name.insert(unformed.name.clone(), TerrainId::UNFORMED);
        Self {
            types: vec![unformed],
            by_name,
        }
    }

    /// Registers a new terrain kind and returns its handle.
    pub fn register(&mut self, terrain: TerrainType) -> Result<TerrainId, CatalogError> {
        if self.by_name.contains_key(&terrain.name) {
            return Err(CatalogError::DuplicateName(terrain.name));
        }
        let raw = u16::try_from(self.types.len()).map_err(|_| CatalogError::CatalogFull)?;
        let id = TerrainId(raw);
        self.by_name.insert(terrain.name.clone(), id);
        self.types.push(terrain);
        Ok(id)
    }

    /// Links a closed/open pair in both directions.
    pub fn link_door(&mut self, closed: TerrainId, open: TerrainId) -> Result<(), CatalogError> {
        if closed == open {
            return Err(CatalogError::SelfTransition(closed));
        }
        for id in [closed, open] {
            if self.get(id).is_none() {
                return Err(CatalogError::UnknownTerrain(id));
            }
        }
        self.types[closed.index()].opens_to = Some(open);
        self.types[open.index()].closes_to = Some(closed);
        Ok(())
    }

    pub fn get(&self, id: TerrainId) -> Option<&TerrainType> {
        self.types.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<TerrainId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TerrainId, &TerrainType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, terrain)| (TerrainId(index as u16), terrain))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TerrainCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<TerrainId> for TerrainCatalog {
    type Output = TerrainType;

    /// # Panics
    ///
    /// Panics if `id` was not issued by this catalog.
    fn index(&self, id: TerrainId) -> &TerrainType {
        self.get(id)
            .unwrap_or_else(|| panic!("terrain {id:?} is not registered in this catalog"))
    }
}

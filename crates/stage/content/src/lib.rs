//! Data-driven content for stages.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Terrain catalogs (data-driven via RON)
//! - Stage layouts drawn as text rows (data-driven via RON)
//! - Stage configuration (data-driven via TOML)
//!
//! A default terrain set is embedded so drivers can build stages without
//! shipping data files.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, FlagSpec, LayoutLoader, StageLayout, TerrainLoader, TerrainSpec,
};

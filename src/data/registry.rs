//! Type registry for tile, actor and structure definitions.
//!
//! Built once at startup (in code or from a TOML type table) and handed by
//! reference to whatever needs to resolve a type name. Records are shared as
//! `Arc`s so tiles, actors and structures can hold their type directly.

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::Deserialize;

use super::schema::{ActorType, StructureType, TileType};
use crate::core::error::{ConfigError, WorldError};

/// On-disk layout of a type table
#[derive(Debug, Default, Deserialize)]
struct TypeTable {
    #[serde(default)]
    tiles: Vec<TileType>,
    #[serde(default)]
    actors: Vec<ActorType>,
    #[serde(default)]
    structures: Vec<StructureType>,
}

/// Lookup of type definitions by name
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    tiles: AHashMap<String, Arc<TileType>>,
    glyphs: AHashMap<char, Arc<TileType>>,
    actors: AHashMap<String, Arc<ActorType>>,
    structures: AHashMap<String, Arc<StructureType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML type table (`[[tiles]]`, `[[actors]]`, `[[structures]]`)
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: TypeTable = toml::from_str(content)?;
        let mut registry = Self::new();
        for tile in table.tiles {
            registry.register_tile(tile)?;
        }
        for actor in table.actors {
            registry.register_actor(actor)?;
        }
        for structure in table.structures {
            registry.register_structure(structure)?;
        }
        Ok(registry)
    }

    /// Load a type table file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn register_tile(&mut self, tile: TileType) -> Result<Arc<TileType>, ConfigError> {
        if self.tiles.contains_key(&tile.name) {
            return Err(ConfigError::Invalid(format!("duplicate tile type '{}'", tile.name)));
        }
        let tile = Arc::new(tile);
        if let Some(glyph) = tile.glyph {
            if self.glyphs.insert(glyph, tile.clone()).is_some() {
                return Err(ConfigError::Invalid(format!("duplicate tile glyph '{}'", glyph)));
            }
        }
        self.tiles.insert(tile.name.clone(), tile.clone());
        Ok(tile)
    }

    pub fn register_actor(&mut self, actor: ActorType) -> Result<Arc<ActorType>, ConfigError> {
        if actor.hit_points <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "actor type '{}' needs positive hit points",
                actor.name
            )));
        }
        if self.actors.contains_key(&actor.name) {
            return Err(ConfigError::Invalid(format!("duplicate actor type '{}'", actor.name)));
        }
        let actor = Arc::new(actor);
        self.actors.insert(actor.name.clone(), actor.clone());
        Ok(actor)
    }

    pub fn register_structure(
        &mut self,
        structure: StructureType,
    ) -> Result<Arc<StructureType>, ConfigError> {
        if self.structures.contains_key(&structure.name) {
            return Err(ConfigError::Invalid(format!(
                "duplicate structure type '{}'",
                structure.name
            )));
        }
        let structure = Arc::new(structure);
        self.structures.insert(structure.name.clone(), structure.clone());
        Ok(structure)
    }

    pub fn tile(&self, name: &str) -> Result<Arc<TileType>, WorldError> {
        self.tiles.get(name).cloned().ok_or_else(|| WorldError::UnknownType {
            kind: "tile",
            name: name.to_string(),
        })
    }

    pub fn tile_by_glyph(&self, glyph: char) -> Option<Arc<TileType>> {
        self.glyphs.get(&glyph).cloned()
    }

    pub fn actor(&self, name: &str) -> Result<Arc<ActorType>, WorldError> {
        self.actors.get(name).cloned().ok_or_else(|| WorldError::UnknownType {
            kind: "actor",
            name: name.to_string(),
        })
    }

    pub fn structure(&self, name: &str) -> Result<Arc<StructureType>, WorldError> {
        self.structures.get(name).cloned().ok_or_else(|| WorldError::UnknownType {
            kind: "structure",
            name: name.to_string(),
        })
    }
}

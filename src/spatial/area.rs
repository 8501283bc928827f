//! Areas: sparse maps of positions to tiles

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::error::WorldError;
use crate::core::types::{ActorId, AreaId};
use crate::data::{TileType, TypeRegistry};
use crate::spatial::position::Position;
use crate::spatial::tile::Tile;

/// A connected region of tiles owned by the world
///
/// Tiles are keyed by position and iterate in ascending (x, y) order.
#[derive(Debug, Clone)]
pub struct Area {
    pub id: AreaId,
    tiles: BTreeMap<Position, Tile>,
}

impl Area {
    pub fn new(id: AreaId) -> Self {
        Self {
            id,
            tiles: BTreeMap::new(),
        }
    }

    /// Rectangle of `width` x `height` tiles of one type, starting at (0, 0)
    pub fn filled(id: AreaId, width: i32, height: i32, tile_type: Arc<TileType>) -> Self {
        let mut area = Self::new(id);
        for y in 0..height {
            for x in 0..width {
                area.insert_tile(Position::new(x, y), tile_type.clone());
            }
        }
        area
    }

    /// Build an area from glyph rows; row index is y, column index is x
    ///
    /// Spaces leave holes (no tile). Any other unknown glyph is an error.
    pub fn from_rows<S: AsRef<str>>(
        id: AreaId,
        rows: &[S],
        registry: &TypeRegistry,
    ) -> Result<Self, WorldError> {
        let mut area = Self::new(id);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.as_ref().chars().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                let tile_type = registry
                    .tile_by_glyph(glyph)
                    .ok_or_else(|| WorldError::UnknownType {
                        kind: "tile glyph",
                        name: glyph.to_string(),
                    })?;
                area.insert_tile(Position::new(x as i32, y as i32), tile_type);
            }
        }
        Ok(area)
    }

    /// Add or replace the tile at `position`
    pub fn insert_tile(&mut self, position: Position, tile_type: Arc<TileType>) {
        self.tiles.insert(position, Tile::new(tile_type));
    }

    pub fn tile(&self, position: &Position) -> Option<&Tile> {
        self.tiles.get(position)
    }

    pub(crate) fn tile_mut(&mut self, position: &Position) -> Option<&mut Tile> {
        self.tiles.get_mut(position)
    }

    pub fn tiles(&self) -> impl Iterator<Item = (&Position, &Tile)> {
        self.tiles.iter()
    }

    /// Actors standing in this area, in tile order
    pub fn occupants(&self) -> impl Iterator<Item = (Position, ActorId)> + '_ {
        self.tiles
            .iter()
            .filter_map(|(pos, tile)| tile.occupant.map(|actor| (*pos, actor)))
    }

    /// Tile exists and is not solid
    pub fn is_walkable(&self, position: &Position) -> bool {
        self.tile(position).map(|t| !t.is_solid()).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

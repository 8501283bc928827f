//! A single grid cell

use std::sync::Arc;

use crate::core::types::{ActorId, StructureId};
use crate::data::{MovementKind, TileType};

/// A cell of an area
///
/// `occupant` and `structure` are back-references by id; the world owns the
/// actors and structures themselves. The occupant is only ever changed by the
/// Move effect.
#[derive(Debug, Clone)]
pub struct Tile {
    pub tile_type: Arc<TileType>,
    pub(crate) occupant: Option<ActorId>,
    pub(crate) structure: Option<StructureId>,
}

impl Tile {
    pub fn new(tile_type: Arc<TileType>) -> Self {
        Self {
            tile_type,
            occupant: None,
            structure: None,
        }
    }

    pub fn speed_multiplier(&self, kind: MovementKind) -> f64 {
        self.tile_type.speed_multiplier(kind)
    }

    pub fn is_solid(&self) -> bool {
        self.tile_type.solid
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<ActorId> {
        self.occupant
    }

    pub fn structure(&self) -> Option<StructureId> {
        self.structure
    }
}

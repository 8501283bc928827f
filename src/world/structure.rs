//! Structures placed on tiles

use std::sync::Arc;

use crate::core::types::{ActorId, StructureId};
use crate::data::{StructureKind, StructureType};
use crate::effects::Effect;
use crate::spatial::Location;
use crate::world::World;

/// A fixed object on a tile that actors can interact with
#[derive(Debug, Clone)]
pub struct Structure {
    pub id: StructureId,
    pub structure_type: Arc<StructureType>,
    pub location: Location,
}

impl Structure {
    pub fn new(id: StructureId, structure_type: Arc<StructureType>, location: Location) -> Self {
        Self {
            id,
            structure_type,
            location,
        }
    }

    /// Effects fired when `actor` finishes interacting with this structure
    pub fn interaction_effects(&self, actor: ActorId, world: &World) -> Vec<Effect> {
        match &self.structure_type.kind {
            StructureKind::Goal => vec![Effect::win(actor)],
            StructureKind::PowerUp { heal } => {
                vec![Effect::heal(actor, *heal), Effect::remove_power_up(self.id)]
            }
            StructureKind::Portal { area, position } => {
                let free = world
                    .area(*area)
                    .and_then(|a| a.tile(position))
                    .map(|tile| !tile.is_solid() && !tile.is_occupied())
                    .unwrap_or(false);
                if free {
                    vec![Effect::move_to(actor, Some(Location::new(*area, *position)))]
                } else {
                    tracing::debug!("{} blocked: destination occupied", self.id);
                    Vec::new()
                }
            }
            StructureKind::Decoration => Vec::new(),
        }
    }
}

//! Observer-side replica of the perceived area
//!
//! Folds the stream of server messages into the local picture a client
//! renders from. An `area` field resets the replica to the accompanying
//! snapshot; every other perception patches it in place.

use std::collections::BTreeMap;

use crate::core::types::{ActorId, AreaId, StructureId};
use crate::net::messages::{EntityView, PerceptionMessage, ServerMessage, StructureView, TileView};
use crate::spatial::Position;

#[derive(Debug, Clone, Default)]
pub struct ObserverReplica {
    pub identity: Option<ActorId>,
    pub area: Option<AreaId>,
    pub tiles: BTreeMap<Position, TileView>,
    pub entities: BTreeMap<ActorId, EntityView>,
    pub structures: BTreeMap<StructureId, StructureView>,
    pub dead: bool,
    pub won: bool,
    /// Number of perceptions that reported a power-up being taken
    pub power_ups_taken: u32,
}

impl ObserverReplica {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::Identity { id } => self.identity = Some(*id),
            ServerMessage::Perception(perception) => self.apply_perception(perception),
        }
    }

    fn apply_perception(&mut self, perception: &PerceptionMessage) {
        if let Some(area) = perception.area {
            self.area = Some(area);
            self.tiles.clear();
            self.entities.clear();
            self.structures.clear();
        }

        if let Some(tiles) = &perception.tiles {
            for (key, view) in tiles {
                match Position::decode(key) {
                    Some(position) => {
                        self.tiles.insert(position, view.clone());
                    }
                    None => tracing::debug!("Ignoring tile with bad key {:?}", key),
                }
            }
        }
        if let Some(entities) = &perception.entities {
            for view in entities {
                self.entities.insert(view.id, view.clone());
            }
        }
        if let Some(structures) = &perception.structures {
            for view in structures {
                self.structures.insert(view.id, view.clone());
            }
        }

        if perception.death == Some(true) {
            self.dead = true;
        }
        if perception.win == Some(true) {
            self.won = true;
        }
        if perception.power_ups == Some(true) {
            self.power_ups_taken += 1;
        }

        self.prune();
    }

    /// Forget entities and structures no visible tile refers to
    fn prune(&mut self) {
        let tiles = &self.tiles;
        self.entities
            .retain(|id, _| tiles.values().any(|t| t.entity == Some(*id)));
        self.structures
            .retain(|id, _| tiles.values().any(|t| t.structure == Some(*id)));
    }

    /// Where an entity currently stands, as far as this observer knows
    pub fn position_of(&self, id: ActorId) -> Option<Position> {
        self.tiles
            .iter()
            .find(|(_, tile)| tile.entity == Some(id))
            .map(|(position, _)| *position)
    }

    /// The observer's own entity
    pub fn me(&self) -> Option<&EntityView> {
        self.identity.and_then(|id| self.entities.get(&id))
    }
}

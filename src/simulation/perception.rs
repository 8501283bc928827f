//! Perception system - what an observer learns from one tick's effects
//!
//! Visibility is decided from each effect's applied-time location snapshot:
//! an effect is seen by a viewer whose current area matches it. The views
//! themselves are taken from the world as it stands after the tick, so a
//! viewer always receives the latest state of whatever it noticed.

use std::collections::BTreeMap;

use crate::core::types::{ActorId, AreaId, StructureId};
use crate::effects::Effect;
use crate::net::messages::{
    EntityView, PerceptionMessage, ServerMessage, StructureView, TileView,
};
use crate::spatial::{Location, Position};
use crate::world::World;

/// One viewer's partial view of a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Perception {
    /// Set when the viewer arrived in a new area; tiles, entities and
    /// structures then hold a full snapshot of it
    pub area: Option<AreaId>,
    pub tiles: BTreeMap<Position, TileView>,
    pub entities: BTreeMap<ActorId, EntityView>,
    pub structures: BTreeMap<StructureId, StructureView>,
    pub death: bool,
    pub win: bool,
    pub power_ups: bool,
}

impl Perception {
    /// Let `viewer` observe every effect in `effects`, in order
    pub fn build(viewer: ActorId, effects: &[Effect], world: &World) -> Self {
        let mut perception = Self::default();
        let viewer_area = world
            .actor(viewer)
            .and_then(|a| a.location())
            .map(|l| l.area);

        for effect in effects {
            perception.observe(viewer, viewer_area, effect, world);
        }
        perception
    }

    fn observe(
        &mut self,
        viewer: ActorId,
        viewer_area: Option<AreaId>,
        effect: &Effect,
        world: &World,
    ) {
        let visible = |location: Option<Location>| {
            location.is_some_and(|l| Some(l.area) == viewer_area)
        };

        match effect {
            Effect::Move { actor, from, to } => {
                if visible(*from) {
                    if let Some(from) = from {
                        self.reveal_tile(*from, world);
                    }
                }
                if visible(*to) {
                    if let Some(to) = to {
                        self.reveal_tile(*to, world);
                    }
                    self.reveal_entity(*actor, world);

                    let changed_area = from.map(|l| l.area) != to.map(|l| l.area);
                    if *actor == viewer && changed_area {
                        if let Some(to) = to {
                            self.snapshot(to.area, world);
                        }
                    }
                }
            }

            Effect::Start { actor, location, .. }
            | Effect::Progress { actor, location, .. }
            | Effect::Complete { actor, location, .. }
            | Effect::Damage {
                target: actor,
                location,
                ..
            }
            | Effect::Heal {
                target: actor,
                location,
                ..
            } => {
                if visible(*location) {
                    self.reveal_entity(*actor, world);
                }
            }

            Effect::Kill { actor, location } => {
                if *actor == viewer {
                    self.death = true;
                }
                if visible(*location) {
                    self.reveal_entity(*actor, world);
                }
            }

            Effect::Win { .. } => self.win = true,

            Effect::RemovePowerUp { location, .. } => {
                self.power_ups = true;
                if visible(*location) {
                    if let Some(location) = location {
                        self.reveal_tile(*location, world);
                    }
                }
            }
        }
    }

    /// Current state of one tile, with whatever stands on it
    fn reveal_tile(&mut self, location: Location, world: &World) {
        let Some(tile) = world
            .area(location.area)
            .and_then(|a| a.tile(&location.position))
        else {
            return;
        };
        self.tiles.insert(location.position, TileView::from(tile));
        if let Some(occupant) = tile.occupant() {
            self.reveal_entity(occupant, world);
        }
        if let Some(structure) = tile.structure() {
            self.reveal_structure(structure, world);
        }
    }

    fn reveal_entity(&mut self, id: ActorId, world: &World) {
        if let Some(actor) = world.actor(id) {
            self.entities.insert(id, EntityView::from(actor));
        }
    }

    fn reveal_structure(&mut self, id: StructureId, world: &World) {
        if let Some(structure) = world.structure(id) {
            self.structures.insert(id, StructureView::from(structure));
        }
    }

    /// Everything currently in `area`
    fn snapshot(&mut self, area: AreaId, world: &World) {
        let Some(tiles) = world.area(area) else {
            return;
        };
        self.area = Some(area);
        for (position, _) in tiles.tiles() {
            self.reveal_tile(Location::new(area, *position), world);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.area.is_none()
            && self.tiles.is_empty()
            && self.entities.is_empty()
            && self.structures.is_empty()
            && !self.death
            && !self.win
            && !self.power_ups
    }

    pub fn to_message(&self) -> ServerMessage {
        let tiles = (!self.tiles.is_empty()).then(|| {
            self.tiles
                .iter()
                .map(|(position, view)| (position.encode(), view.clone()))
                .collect()
        });
        let entities =
            (!self.entities.is_empty()).then(|| self.entities.values().cloned().collect());
        let structures =
            (!self.structures.is_empty()).then(|| self.structures.values().cloned().collect());

        ServerMessage::Perception(PerceptionMessage {
            area: self.area,
            tiles,
            entities,
            structures,
            death: self.death.then_some(true),
            win: self.win.then_some(true),
            power_ups: self.power_ups.then_some(true),
        })
    }
}

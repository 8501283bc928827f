//! World - owns every area, actor and structure
//!
//! The world is the only root of mutation. Outside of setup (adding areas,
//! spawning, placing structures), state changes go through
//! [`World::apply`](crate::effects), which also records them in the current
//! tick's effect sequence.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, WorldError};
use crate::core::types::{ActorId, AreaId, StructureId, Tick};
use crate::data::{ActorType, StructureType};
use crate::effects::Effect;
use crate::entity::{update_actor, Action, Actor, Behavior, Intent};
use crate::spatial::{Area, Location, PathCache, Position};
use crate::world::objects::WorldObjects;
use crate::world::structure::Structure;

/// The authoritative game world
#[derive(Debug)]
pub struct World {
    pub current_tick: Tick,
    config: SimulationConfig,
    pub(crate) areas: BTreeMap<AreaId, Area>,
    /// Ordered by id: actors are updated in ascending id order
    pub(crate) actors: BTreeMap<ActorId, Actor>,
    pub(crate) structures: WorldObjects,
    pub(crate) effects: Vec<Effect>,
    pub(crate) winner: Option<ActorId>,
    spawn_points: Vec<Location>,
    paths: RefCell<PathCache>,
}

impl World {
    pub fn new(config: SimulationConfig) -> Self {
        let paths = PathCache::with_capacity(config.path_cache_capacity);
        Self {
            current_tick: 0,
            config,
            areas: BTreeMap::new(),
            actors: BTreeMap::new(),
            structures: WorldObjects::new(),
            effects: Vec::new(),
            winner: None,
            spawn_points: Vec::new(),
            paths: RefCell::new(paths),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // === AREAS ===

    /// Add an area, replacing any area with the same id
    ///
    /// Actors standing in a replaced area are moved to the same position in
    /// the new one, or taken off-world if that tile is missing or taken.
    /// Structures are placed on the same position too, and dropped when
    /// their tile is gone. Returns the detached area.
    pub fn add_area(&mut self, area: Area) -> Option<Area> {
        let id = area.id;
        let old = self.areas.insert(id, area);
        self.paths.borrow_mut().invalidate();

        let old = old?;
        tracing::debug!("Replaced {}", id);
        self.relink_structures(id);

        let mut claimed = Vec::new();
        for (position, actor) in old.occupants() {
            let free = self
                .areas
                .get(&id)
                .and_then(|a| a.tile(&position))
                .map(|t| !t.is_solid() && t.occupant().map_or(true, |o| o == actor))
                .unwrap_or(false)
                && !claimed.contains(&position);
            let destination = free.then(|| Location::new(id, position));
            if free {
                claimed.push(position);
            }
            if let Some(a) = self.actors.get_mut(&actor) {
                // The old tile is gone; start the move from off-world
                a.location = None;
            }
            self.apply(Effect::move_to(actor, destination));
        }
        Some(old)
    }

    fn relink_structures(&mut self, id: AreaId) {
        let placed: Vec<(StructureId, Position)> = self
            .structures
            .in_area(id)
            .map(|s| (s.id, s.location.position))
            .collect();

        for (structure, position) in placed {
            let tile = self
                .areas
                .get_mut(&id)
                .and_then(|a| a.tile_mut(&position))
                .filter(|t| t.structure.is_none());
            match tile {
                Some(tile) => tile.structure = Some(structure),
                None => {
                    tracing::debug!("{} lost its tile in {}", structure, id);
                    self.structures.remove(structure);
                }
            }
        }
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(&id)
    }

    pub(crate) fn area_mut(&mut self, id: AreaId) -> Option<&mut Area> {
        self.areas.get_mut(&id)
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.values()
    }

    // === ACTORS ===

    /// Lowest actor id not currently in use
    fn next_actor_id(&self) -> ActorId {
        let mut id = 0;
        while self.actors.contains_key(&ActorId(id)) {
            id += 1;
        }
        ActorId(id)
    }

    /// Register a new actor and place it at `location` via a Move effect
    pub fn spawn_actor(
        &mut self,
        actor_type: Arc<ActorType>,
        faction: Option<String>,
        location: Location,
    ) -> Result<ActorId> {
        self.check_free(location)?;

        let id = self.next_actor_id();
        self.actors.insert(id, Actor::new(id, actor_type, faction));
        self.apply(Effect::move_to(id, Some(location)));
        Ok(id)
    }

    fn check_free(&self, location: Location) -> Result<()> {
        let area = self
            .area(location.area)
            .ok_or(WorldError::AreaNotFound(location.area))?;
        let tile = area
            .tile(&location.position)
            .filter(|t| !t.is_solid())
            .ok_or(WorldError::TileNotFound {
                area: location.area,
                position: location.position,
            })?;
        if tile.is_occupied() {
            return Err(WorldError::TileOccupied {
                area: location.area,
                position: location.position,
            });
        }
        Ok(())
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// All registered actors in ascending id order
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Replace an actor's goal
    ///
    /// A different intent cancels the in-progress action; re-issuing the
    /// current one leaves it running.
    pub fn set_intent(&mut self, id: ActorId, intent: Option<Intent>) -> bool {
        let Some(actor) = self.actors.get_mut(&id) else {
            return false;
        };
        if actor.intent == intent {
            return true;
        }
        actor.intent = intent;
        if actor.action.is_some() {
            tracing::debug!("{} changed intent, cancelling its action", id);
            self.apply(Effect::start(id, None));
        }
        true
    }

    pub fn set_behavior(&mut self, id: ActorId, behavior: Option<Behavior>) -> Result<()> {
        let actor = self.actors.get_mut(&id).ok_or(WorldError::ActorNotFound(id))?;
        actor.behavior = behavior;
        Ok(())
    }

    /// Store re-derived legality fields on the in-progress action
    pub(crate) fn refresh_action(&mut self, id: ActorId, action: Action) {
        if let Some(current) = self.actors.get_mut(&id).and_then(|a| a.action.as_mut()) {
            let progress = current.progress;
            *current = action;
            current.progress = progress;
        }
    }

    /// Remove an actor from the registry, dropping any tile references
    pub(crate) fn deregister_actor(&mut self, id: ActorId) {
        let Some(actor) = self.actors.remove(&id) else {
            return;
        };
        if let Some(location) = actor.location {
            if let Some(tile) = self
                .areas
                .get_mut(&location.area)
                .and_then(|a| a.tile_mut(&location.position))
            {
                if tile.occupant == Some(id) {
                    tile.occupant = None;
                }
            }
        }
        tracing::debug!("Deregistered {}", id);
    }

    // === STRUCTURES ===

    /// Place a structure on a tile
    pub fn add_structure(
        &mut self,
        structure_type: Arc<StructureType>,
        location: Location,
    ) -> Result<StructureId> {
        let tile = self
            .areas
            .get_mut(&location.area)
            .ok_or(WorldError::AreaNotFound(location.area))?
            .tile_mut(&location.position)
            .ok_or(WorldError::TileNotFound {
                area: location.area,
                position: location.position,
            })?;
        if tile.structure.is_some() {
            return Err(WorldError::TileOccupied {
                area: location.area,
                position: location.position,
            });
        }

        let id = self.structures.next_id();
        tile.structure = Some(id);
        self.structures.add(Structure::new(id, structure_type, location));
        Ok(id)
    }

    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.get(id)
    }

    pub fn structures(&self) -> &WorldObjects {
        &self.structures
    }

    // === SPAWNING ===

    pub fn add_spawn_point(&mut self, location: Location) {
        self.spawn_points.push(location);
    }

    /// First configured spawn point whose tile is free
    pub fn free_spawn_point(&self) -> Option<Location> {
        self.spawn_points
            .iter()
            .copied()
            .find(|&location| self.check_free(location).is_ok())
    }

    // === PATHFINDING ===

    /// Cached shortest path inside one area
    pub fn find_path(&self, area: AreaId, start: Position, goal: Position) -> Option<Vec<Position>> {
        let area = self.areas.get(&area)?;
        self.paths.borrow_mut().find_path(area, start, goal)
    }

    pub fn invalidate_paths(&self) {
        self.paths.borrow_mut().invalidate();
    }

    // === TICKING ===

    /// Winning actor, once a Win effect has been applied
    pub fn winner(&self) -> Option<ActorId> {
        self.winner
    }

    /// Advance every actor by `dt` seconds, in ascending id order
    ///
    /// Actors spawned during this pass wait for the next one.
    pub fn advance(&mut self, dt: f64) {
        for id in self.actor_ids() {
            if self.actors.contains_key(&id) {
                update_actor(self, id, dt);
            }
        }
        self.current_tick += 1;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MovementKind, StructureKind, TileType};
    use crate::spatial::Direction;

    fn grass() -> Arc<TileType> {
        Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0))
    }

    fn walker() -> Arc<ActorType> {
        Arc::new(ActorType::new("walker", 10.0).with_speed(MovementKind::Ground, 1.0))
    }

    fn at(x: i32, y: i32) -> Location {
        Location::new(AreaId(0), Position::new(x, y))
    }

    fn mid_step_east() -> (World, ActorId) {
        let mut world = World::default();
        world.add_area(Area::filled(AreaId(0), 3, 1, grass()));
        let id = world.spawn_actor(walker(), None, at(1, 0)).unwrap();
        world.set_intent(id, Some(Intent::move_to(Position::new(2, 0))));
        world.advance(0.5);
        world.take_effects();
        (world, id)
    }

    #[test]
    fn test_new_intent_cancels_action() {
        let (mut world, id) = mid_step_east();
        assert_eq!(
            world.actor(id).unwrap().action().and_then(|a| a.direction),
            Some(Direction::East)
        );

        world.set_intent(id, Some(Intent::move_to(Position::new(0, 0))));

        assert!(world.actor(id).unwrap().action().is_none());
        assert!(matches!(
            world.effects(),
            [Effect::Start { action: None, .. }]
        ));

        world.advance(0.5);
        let actor = world.actor(id).unwrap();
        assert_eq!(actor.location(), Some(at(1, 0)));
        assert_eq!(actor.action().and_then(|a| a.direction), Some(Direction::West));

        world.advance(0.5);
        assert_eq!(world.actor(id).unwrap().location(), Some(at(0, 0)));
    }

    #[test]
    fn test_same_intent_keeps_action() {
        let (mut world, id) = mid_step_east();

        world.set_intent(id, Some(Intent::move_to(Position::new(2, 0))));

        assert!(world.effects().is_empty());
        let progress = world.actor(id).unwrap().action().map(|a| a.progress());
        assert_eq!(progress, Some(0.5));

        world.advance(0.5);
        assert_eq!(world.actor(id).unwrap().location(), Some(at(2, 0)));
    }

    #[test]
    fn test_replacing_area_migrates_occupants() {
        let mut world = World::default();
        world.add_area(Area::filled(AreaId(0), 3, 1, grass()));
        let kept = world.spawn_actor(walker(), None, at(0, 0)).unwrap();
        let walled = world.spawn_actor(walker(), None, at(1, 0)).unwrap();
        let stranded = world.spawn_actor(walker(), None, at(2, 0)).unwrap();

        let mut smaller = Area::filled(AreaId(0), 2, 1, grass());
        smaller.insert_tile(Position::new(1, 0), Arc::new(TileType::new("wall").solid()));
        assert!(world.add_area(smaller).is_some());

        assert_eq!(world.actor(kept).unwrap().location(), Some(at(0, 0)));
        assert_eq!(world.actor(walled).unwrap().location(), None);
        assert_eq!(world.actor(stranded).unwrap().location(), None);
        assert_eq!(world.actor_count(), 3);

        let area = world.area(AreaId(0)).unwrap();
        for (position, tile) in area.tiles() {
            let expected = world
                .actors()
                .find(|a| a.location() == Some(at(position.x, position.y)))
                .map(|a| a.id);
            assert_eq!(tile.occupant(), expected);
        }
    }

    #[test]
    fn test_replacing_area_relinks_structures() {
        let mut world = World::default();
        world.add_area(Area::filled(AreaId(0), 3, 1, grass()));
        let statue = Arc::new(StructureType::new("statue", StructureKind::Decoration));
        let kept = world.add_structure(statue.clone(), at(0, 0)).unwrap();
        let lost = world.add_structure(statue, at(2, 0)).unwrap();

        world.add_area(Area::filled(AreaId(0), 2, 1, grass()));

        let tile = world.area(AreaId(0)).unwrap().tile(&Position::new(0, 0)).unwrap();
        assert_eq!(tile.structure(), Some(kept));
        assert!(world.structure(kept).is_some());
        assert!(world.structure(lost).is_none());
    }
}

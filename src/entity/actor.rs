//! Actors: the agents living in the world

use std::sync::Arc;

use crate::core::types::ActorId;
use crate::data::ActorType;
use crate::entity::action::Action;
use crate::entity::behavior::Behavior;
use crate::entity::intent::Intent;
use crate::spatial::Location;

/// An agent occupying the world, driven by a player or a behaviour
///
/// Location, hit points and the in-progress action are only changed by
/// effects; the tile occupancy that mirrors `location` is kept in step by the
/// Move effect.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub actor_type: Arc<ActorType>,
    /// `None` is neutral
    pub faction: Option<String>,
    pub intent: Option<Intent>,
    pub behavior: Option<Behavior>,
    pub(crate) location: Option<Location>,
    pub(crate) hit_points: f64,
    pub(crate) action: Option<Action>,
}

impl Actor {
    pub(crate) fn new(id: ActorId, actor_type: Arc<ActorType>, faction: Option<String>) -> Self {
        let hit_points = actor_type.hit_points;
        Self {
            id,
            actor_type,
            faction,
            intent: None,
            behavior: None,
            location: None,
            hit_points,
            action: None,
        }
    }

    /// `None` while off-world
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn hit_points(&self) -> f64 {
        self.hit_points
    }

    pub fn max_hit_points(&self) -> f64 {
        self.actor_type.hit_points
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0.0
    }
}

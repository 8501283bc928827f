//! Atomic, time-integrated actions
//!
//! An action is one short step toward an intent: cross one tile edge, land
//! one blow, finish one interaction. Each update re-derives its rate
//! (completions per second) from the current world; a rate of zero means the
//! action is no longer legal and gets cancelled.

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, StructureId};
use crate::effects::Effect;
use crate::spatial::{Direction, Location, Position};
use crate::world::World;

/// What the action does when it completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    Attack { target: ActorId },
    Interact { target: StructureId },
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Move => "Move",
            ActionKind::Attack { .. } => "Attack",
            ActionKind::Interact { .. } => "Interact",
        }
    }
}

/// An action in progress (or about to start)
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub direction: Option<Direction>,
    /// `None` until the action is started
    pub progress: Option<f64>,

    // Cached by the last legality check
    pub target_position: Option<Position>,
    pub distance: f64,
    /// Completions per second; zero when illegal
    pub speed: f64,
}

impl Action {
    fn new(kind: ActionKind, direction: Option<Direction>) -> Self {
        Self {
            kind,
            direction,
            progress: None,
            target_position: None,
            distance: 0.0,
            speed: 0.0,
        }
    }

    /// Step onto the neighbouring tile in `direction`
    pub fn step(direction: Direction) -> Self {
        Self::new(ActionKind::Move, Some(direction))
    }

    pub fn attack(target: ActorId) -> Self {
        Self::new(ActionKind::Attack { target }, None)
    }

    pub fn interact(target: StructureId) -> Self {
        Self::new(ActionKind::Interact { target }, None)
    }

    pub fn progress(&self) -> f64 {
        self.progress.unwrap_or(0.0)
    }

    /// Re-derive the cached fields and return the completion rate
    ///
    /// Returns 0.0 when the action is illegal for `actor` right now.
    pub fn check(&mut self, actor: ActorId, world: &World) -> f64 {
        self.target_position = None;
        self.distance = 0.0;
        self.speed = self.derive_rate(actor, world).unwrap_or(0.0);
        self.speed
    }

    fn derive_rate(&mut self, actor_id: ActorId, world: &World) -> Option<f64> {
        let actor = world.actor(actor_id)?;
        let here = actor.location()?;
        let config = world.config();

        match self.kind {
            ActionKind::Move => {
                let destination = here.position.neighbor(self.direction?);
                let tile = world.area(here.area)?.tile(&destination)?;
                if tile.is_solid() || tile.is_occupied() {
                    return None;
                }

                let distance = here.position.distance(&destination);
                self.target_position = Some(destination);
                self.distance = distance;
                Some(actor.actor_type.speed_over(&tile.tile_type) / distance)
            }
            ActionKind::Attack { target } => {
                if target == actor_id {
                    return None;
                }
                let there = world.actor(target)?.location()?;
                if there.area != here.area {
                    return None;
                }

                let distance = here.position.distance(&there.position);
                self.target_position = Some(there.position);
                self.distance = distance;
                self.direction = here.position.direction_to(&there.position);
                if distance >= config.melee_range {
                    return None;
                }
                Some(actor.actor_type.attack_speed)
            }
            ActionKind::Interact { target } => {
                let structure = world.structure(target)?;
                let there = structure.location;
                if there.area != here.area {
                    return None;
                }

                let distance = here.position.distance(&there.position);
                self.target_position = Some(there.position);
                self.distance = distance;
                self.direction = here.position.direction_to(&there.position);
                if distance >= config.interact_range {
                    return None;
                }
                Some(structure.structure_type.interact_rate())
            }
        }
    }

    /// Advance by up to `dt` seconds at the cached rate
    ///
    /// Returns `(new_progress, elapsed)`; see [`integrate`].
    pub fn update(&self, dt: f64) -> (f64, f64) {
        integrate(self.progress(), self.speed, dt)
    }

    /// Effects caused when this action completes
    pub fn complete(&self, actor_id: ActorId, world: &World) -> Vec<Effect> {
        let Some(actor) = world.actor(actor_id) else {
            return Vec::new();
        };

        match self.kind {
            ActionKind::Move => {
                let (Some(here), Some(destination)) = (actor.location(), self.target_position) else {
                    return Vec::new();
                };
                let free = world
                    .area(here.area)
                    .and_then(|area| area.tile(&destination))
                    .map(|tile| !tile.is_solid() && !tile.is_occupied())
                    .unwrap_or(false);
                if !free {
                    return Vec::new();
                }
                vec![Effect::move_to(actor_id, Some(Location::new(here.area, destination)))]
            }
            ActionKind::Attack { target } => {
                vec![Effect::damage(target, actor.actor_type.damage)]
            }
            ActionKind::Interact { target } => world
                .structure(target)
                .map(|structure| structure.interaction_effects(actor_id, world))
                .unwrap_or_default(),
        }
    }
}

/// Generic per-action time integration
///
/// With progress `p`, rate `r` and `dt` seconds available, the action gains
/// `r * dt` progress, clamped so it never passes 1.0. The second value is the
/// time actually spent: all of `dt`, unless completion cut it short.
pub fn integrate(progress: f64, rate: f64, dt: f64) -> (f64, f64) {
    if rate <= 0.0 || dt <= 0.0 {
        return (progress, 0.0);
    }

    let tick_progress = rate * dt;
    if progress + tick_progress < 1.0 {
        return (progress + tick_progress, dt);
    }

    let new_progress = 1.0;
    let elapsed = dt * (new_progress - progress) / tick_progress;
    (new_progress, elapsed.min(dt))
}

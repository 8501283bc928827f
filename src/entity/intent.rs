//! Intents: medium-term goals that generate actions
//!
//! Intents hold nothing but their target. Compound intents (attack,
//! interact) approach their target through a Move intent rebuilt from the
//! target's current position every time an action is needed, so pursuers
//! re-path as the target moves.

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, StructureId};
use crate::entity::action::Action;
use crate::spatial::{Location, Position};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Move { target: Position },
    Attack { target: ActorId },
    Interact { target: StructureId },
}

impl Intent {
    pub fn move_to(target: Position) -> Self {
        Intent::Move { target }
    }

    pub fn attack(target: ActorId) -> Self {
        Intent::Attack { target }
    }

    pub fn interact(target: StructureId) -> Self {
        Intent::Interact { target }
    }

    /// The next action toward this goal, or `None` if the goal is reached or
    /// cannot be pursued
    pub fn next_action(&self, actor: ActorId, world: &World) -> Option<Action> {
        let here = world.actor(actor)?.location()?;

        match *self {
            Intent::Move { target } => step_toward(here, target, world),
            Intent::Attack { target } => {
                let there = world.actor(target)?.location()?;
                if there.area != here.area || target == actor {
                    return None;
                }
                if here.position.distance(&there.position) < world.config().melee_range {
                    Some(Action::attack(target))
                } else {
                    Intent::move_to(there.position).next_action(actor, world)
                }
            }
            Intent::Interact { target } => {
                let there = world.structure(target)?.location;
                if there.area != here.area {
                    return None;
                }
                if here.position.distance(&there.position) < world.config().interact_range {
                    Some(Action::interact(target))
                } else {
                    Intent::move_to(there.position).next_action(actor, world)
                }
            }
        }
    }
}

/// First step of the shortest path from `here` to `target`
fn step_toward(here: Location, target: Position, world: &World) -> Option<Action> {
    if here.position == target {
        return None;
    }
    let path = world.find_path(here.area, here.position, target)?;
    let next = path.get(1)?;
    let direction = here.position.direction_to(next)?;
    Some(Action::step(direction))
}

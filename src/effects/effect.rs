//! Effects: atomic, recorded world mutations
//!
//! Each effect snapshots the location of the object it touched at the moment
//! it was applied, so observing it later is unaffected by anything that
//! happened afterwards in the tick. Applying an effect returns the
//! consequences it causes; the engine applies those before moving on.

use crate::core::types::{ActorId, StructureId};
use crate::entity::{Action, ActionKind, Intent};
use crate::spatial::Location;
use crate::world::World;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Install (or, with `None`, cancel) an actor's action
    Start {
        actor: ActorId,
        action: Option<Action>,
        location: Option<Location>,
    },
    /// Record new progress on the actor's action
    Progress {
        actor: ActorId,
        progress: f64,
        location: Option<Location>,
    },
    /// Clear the finished action and fire its completion logic
    Complete {
        actor: ActorId,
        action: Option<Action>,
        location: Option<Location>,
    },
    /// Relocate an actor; `to: None` takes it off-world
    Move {
        actor: ActorId,
        from: Option<Location>,
        to: Option<Location>,
    },
    Damage {
        target: ActorId,
        amount: f64,
        location: Option<Location>,
    },
    Heal {
        target: ActorId,
        amount: f64,
        location: Option<Location>,
    },
    Kill {
        actor: ActorId,
        location: Option<Location>,
    },
    Win {
        actor: ActorId,
    },
    RemovePowerUp {
        structure: StructureId,
        location: Option<Location>,
    },
}

/// Something an applied effect causes
#[derive(Debug, Clone, PartialEq)]
pub enum Consequence {
    /// A follow-up effect, applied (with its own cascade) in order
    Cause(Effect),
    /// Drop the actor from the world's registry
    Deregister(ActorId),
}

impl Effect {
    pub fn start(actor: ActorId, action: Option<Action>) -> Self {
        Effect::Start {
            actor,
            action,
            location: None,
        }
    }

    pub fn progress(actor: ActorId, progress: f64) -> Self {
        Effect::Progress {
            actor,
            progress,
            location: None,
        }
    }

    pub fn complete(actor: ActorId) -> Self {
        Effect::Complete {
            actor,
            action: None,
            location: None,
        }
    }

    pub fn move_to(actor: ActorId, to: Option<Location>) -> Self {
        Effect::Move {
            actor,
            from: None,
            to,
        }
    }

    pub fn damage(target: ActorId, amount: f64) -> Self {
        Effect::Damage {
            target,
            amount,
            location: None,
        }
    }

    pub fn heal(target: ActorId, amount: f64) -> Self {
        Effect::Heal {
            target,
            amount,
            location: None,
        }
    }

    pub fn kill(actor: ActorId) -> Self {
        Effect::Kill {
            actor,
            location: None,
        }
    }

    pub fn win(actor: ActorId) -> Self {
        Effect::Win { actor }
    }

    pub fn remove_power_up(structure: StructureId) -> Self {
        Effect::RemovePowerUp {
            structure,
            location: None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Start { .. } => "Start",
            Effect::Progress { .. } => "Progress",
            Effect::Complete { .. } => "Complete",
            Effect::Move { .. } => "Move",
            Effect::Damage { .. } => "Damage",
            Effect::Heal { .. } => "Heal",
            Effect::Kill { .. } => "Kill",
            Effect::Win { .. } => "Win",
            Effect::RemovePowerUp { .. } => "RemovePowerUp",
        }
    }

    /// Location snapshot taken when the effect was applied
    ///
    /// For Move this is the destination.
    pub fn location(&self) -> Option<Location> {
        match self {
            Effect::Start { location, .. }
            | Effect::Progress { location, .. }
            | Effect::Complete { location, .. }
            | Effect::Damage { location, .. }
            | Effect::Heal { location, .. }
            | Effect::Kill { location, .. }
            | Effect::RemovePowerUp { location, .. } => *location,
            Effect::Move { to, .. } => *to,
            Effect::Win { .. } => None,
        }
    }

    /// Mutate the world, fill in the snapshot, and return what this causes
    pub(crate) fn apply(&mut self, world: &mut World) -> Vec<Consequence> {
        match self {
            Effect::Start {
                actor,
                action,
                location,
            } => {
                let Some(a) = world.actor_mut(*actor) else {
                    return Vec::new();
                };
                *location = a.location;
                if let Some(action) = action.as_mut() {
                    action.progress = Some(0.0);
                }
                a.action = action.clone();
                Vec::new()
            }

            Effect::Progress {
                actor,
                progress,
                location,
            } => {
                let threshold = 1.0 - world.config().progress_epsilon;
                let Some(a) = world.actor_mut(*actor) else {
                    return Vec::new();
                };
                *location = a.location;
                let Some(action) = a.action.as_mut() else {
                    return Vec::new();
                };
                action.progress = Some(*progress);
                if *progress >= threshold {
                    vec![Consequence::Cause(Effect::complete(*actor))]
                } else {
                    Vec::new()
                }
            }

            Effect::Complete {
                actor,
                action,
                location,
            } => {
                let Some(a) = world.actor_mut(*actor) else {
                    return Vec::new();
                };
                *location = a.location;
                *action = a.action.take();
                // An interaction is the last step of its intent
                if let Some(ActionKind::Interact { target }) = action.as_ref().map(|f| f.kind) {
                    if a.intent == Some(Intent::interact(target)) {
                        a.intent = None;
                    }
                }
                match action {
                    Some(finished) => finished
                        .complete(*actor, world)
                        .into_iter()
                        .map(Consequence::Cause)
                        .collect(),
                    None => Vec::new(),
                }
            }

            Effect::Move { actor, from, to } => {
                let Some(current) = world.actor(*actor).map(|a| a.location) else {
                    return Vec::new();
                };
                *from = current;

                if let Some(destination) = *to {
                    let enterable = world
                        .area(destination.area)
                        .and_then(|area| area.tile(&destination.position))
                        .map(|tile| {
                            !tile.is_solid() && tile.occupant().map_or(true, |o| o == *actor)
                        })
                        .unwrap_or(false);
                    if !enterable {
                        tracing::debug!("{} cannot enter {}", actor, destination);
                        *to = current;
                        return Vec::new();
                    }
                }

                if let Some(old) = current {
                    if let Some(tile) = world
                        .area_mut(old.area)
                        .and_then(|area| area.tile_mut(&old.position))
                    {
                        if tile.occupant == Some(*actor) {
                            tile.occupant = None;
                        }
                    }
                }
                if let Some(new) = *to {
                    if let Some(tile) = world
                        .area_mut(new.area)
                        .and_then(|area| area.tile_mut(&new.position))
                    {
                        tile.occupant = Some(*actor);
                    }
                }
                if let Some(a) = world.actor_mut(*actor) {
                    a.location = *to;
                }
                Vec::new()
            }

            Effect::Damage {
                target,
                amount,
                location,
            } => {
                let epsilon = world.config().hit_point_epsilon;
                let Some(a) = world.actor_mut(*target) else {
                    return Vec::new();
                };
                *location = a.location;
                a.hit_points -= *amount;
                if a.hit_points <= epsilon {
                    vec![Consequence::Cause(Effect::kill(*target))]
                } else {
                    Vec::new()
                }
            }

            Effect::Heal {
                target,
                amount,
                location,
            } => {
                let Some(a) = world.actor_mut(*target) else {
                    return Vec::new();
                };
                *location = a.location;
                a.hit_points = (a.hit_points + *amount).min(a.max_hit_points());
                Vec::new()
            }

            Effect::Kill { actor, location } => {
                let Some(a) = world.actor_mut(*actor) else {
                    return Vec::new();
                };
                *location = a.location;
                a.hit_points = 0.0;
                a.action = None;
                a.intent = None;
                tracing::debug!("{} killed", actor);
                vec![
                    Consequence::Cause(Effect::move_to(*actor, None)),
                    Consequence::Deregister(*actor),
                ]
            }

            Effect::Win { actor } => {
                if world.winner.is_none() {
                    world.winner = Some(*actor);
                }
                Vec::new()
            }

            Effect::RemovePowerUp {
                structure,
                location,
            } => {
                let Some(removed) = world.structures.remove(*structure) else {
                    return Vec::new();
                };
                *location = Some(removed.location);
                if let Some(tile) = world
                    .area_mut(removed.location.area)
                    .and_then(|area| area.tile_mut(&removed.location.position))
                {
                    if tile.structure == Some(*structure) {
                        tile.structure = None;
                    }
                }
                Vec::new()
            }
        }
    }
}

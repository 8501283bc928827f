//! Behaviour drivers for non-player actors
//!
//! Once per tick, before the actor acts, its driver looks at the world and
//! may hand back a replacement intent. Returning `None` keeps the current one.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::types::ActorId;
use crate::entity::actor::Actor;
use crate::entity::intent::Intent;
use crate::spatial::Position;
use crate::world::World;

#[derive(Debug, Clone)]
pub enum Behavior {
    /// Attack the nearest hostile actor within `aggro_range`
    Hunter { aggro_range: f64 },
    /// Walk to random tiles within `radius` whenever idle
    Wanderer { radius: i32, rng: ChaCha8Rng },
}

impl Behavior {
    pub fn hunter(aggro_range: f64) -> Self {
        Behavior::Hunter { aggro_range }
    }

    pub fn wanderer(radius: i32, seed: u64) -> Self {
        Behavior::Wanderer {
            radius,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn decide(&mut self, actor: &Actor, world: &World) -> Option<Intent> {
        match self {
            Behavior::Hunter { aggro_range } => {
                nearest_hostile(actor, world, *aggro_range).map(Intent::attack)
            }
            Behavior::Wanderer { radius, rng } => {
                if actor.intent.is_some() || actor.action().is_some() {
                    return None;
                }
                let here = actor.location()?;
                let area = world.area(here.area)?;

                let r = (*radius).max(0);
                let dx = rng.gen_range(-r..=r);
                let dy = rng.gen_range(-r..=r);
                let target = Position::new(here.position.x + dx, here.position.y + dy);
                if target == here.position || !area.is_walkable(&target) {
                    return None;
                }
                Some(Intent::move_to(target))
            }
        }
    }
}

/// Hostile means a different faction label, and the other actor has one
pub fn is_hostile(actor: &Actor, other: &Actor) -> bool {
    other.faction.is_some() && actor.faction != other.faction
}

/// Closest hostile actor in the same area; ties go to the lowest id
fn nearest_hostile(actor: &Actor, world: &World, range: f64) -> Option<ActorId> {
    let here = actor.location()?;
    let mut best: Option<(ActorId, f64)> = None;

    for other in world.actors() {
        if other.id == actor.id || !is_hostile(actor, other) {
            continue;
        }
        let Some(there) = other.location() else {
            continue;
        };
        if there.area != here.area {
            continue;
        }
        let distance = here.position.distance(&there.position);
        if distance > range {
            continue;
        }
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((other.id, distance)),
        }
    }

    best.map(|(id, _)| id)
}

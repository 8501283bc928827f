//! Per-tick actor update: behaviour, intent resolution and action timing
//!
//! An update spends a time budget. Each step either starts an action from
//! the intent or advances the current one; a completed action hands the
//! rest of the budget to the next, so fast actors can finish several actions
//! in one tick.

use crate::core::types::ActorId;
use crate::effects::Effect;
use crate::world::World;

/// Advance one actor by `dt` seconds
///
/// Returns the time actually spent, which is less than `dt` when the actor
/// runs out of things to do.
pub fn update_actor(world: &mut World, id: ActorId, dt: f64) -> f64 {
    run_behavior(world, id);

    let max_steps = world.config().max_steps_per_update;
    let mut remaining = dt;
    let mut steps = 0;

    while remaining > 0.0 && steps < max_steps {
        steps += 1;

        let Some(actor) = world.actor(id) else {
            break;
        };
        if actor.location().is_none() {
            break;
        }

        if actor.action().is_none() {
            let Some(intent) = actor.intent else {
                break;
            };
            let started = intent.next_action(id, world).and_then(|mut action| {
                (action.check(id, world) > 0.0).then_some(action)
            });
            match started {
                Some(action) => world.apply(Effect::start(id, Some(action))),
                None => {
                    tracing::debug!("{} dropped intent {:?}", id, intent);
                    world.set_intent(id, None);
                    break;
                }
            }
        }

        let Some(mut action) = world.actor(id).and_then(|a| a.action().cloned()) else {
            break;
        };
        if action.check(id, world) <= 0.0 {
            tracing::debug!("{} cancelled illegal {} action", id, action.kind.name());
            world.apply(Effect::start(id, None));
            continue;
        }

        let (progress, elapsed) = action.update(remaining);
        world.refresh_action(id, action);
        world.apply(Effect::progress(id, progress));
        remaining -= elapsed;
    }

    dt - remaining.max(0.0)
}

/// Let the behaviour driver replace the intent
fn run_behavior(world: &mut World, id: ActorId) {
    let Some(mut behavior) = world.actor_mut(id).and_then(|a| a.behavior.take()) else {
        return;
    };

    let decision = world.actor(id).and_then(|actor| behavior.decide(actor, world));

    if let Some(actor) = world.actor_mut(id) {
        actor.behavior = Some(behavior);
    }
    if let Some(intent) = decision {
        world.set_intent(id, Some(intent));
    }
}

//! Effect engine - applies effects and records the tick's causal sequence
//!
//! Cascades are driven by an explicit work stack rather than recursion.
//! Consequences are pushed in reverse, so the stack always pops the first
//! unfinished consequence of the most recent effect: the recorded sequence is
//! the pre-order flattening of the causality tree. A parent is recorded
//! before anything it causes, and a consequence's whole cascade finishes
//! before its next sibling starts.

use crate::effects::effect::{Consequence, Effect};
use crate::world::World;

impl World {
    /// Apply an effect and everything it causes
    pub fn apply(&mut self, effect: Effect) {
        let mut stack = vec![Consequence::Cause(effect)];

        while let Some(next) = stack.pop() {
            match next {
                Consequence::Cause(mut effect) => {
                    let caused = effect.apply(self);
                    tracing::trace!(effect = effect.name(), caused = caused.len(), "applied");
                    self.effects.push(effect);
                    stack.extend(caused.into_iter().rev());
                }
                Consequence::Deregister(actor) => self.deregister_actor(actor),
            }
        }
    }

    /// Effects recorded so far this tick
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Hand over this tick's effect sequence and start a fresh one
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

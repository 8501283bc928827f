//! Actor state machine: actors, intents, actions and behaviour drivers

pub mod action;
pub mod actor;
pub mod behavior;
pub mod intent;
pub mod update;

pub use action::{integrate, Action, ActionKind};
pub use actor::Actor;
pub use behavior::{is_hostile, Behavior};
pub use intent::Intent;
pub use update::update_actor;

//! Simulation host: fixed-step loop and per-observer perception

pub mod perception;
pub mod tick;

pub use perception::Perception;
pub use tick::{Observer, Simulation, TickReport};

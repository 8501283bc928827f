//! Tileworld - authoritative tile-based world simulation
//!
//! Actors move and fight on tile grids, every state change is an effect
//! recorded in causal order, and connected observers receive per-tick
//! perceptions derived from those effects.

pub mod core;
pub mod data;
pub mod effects;
pub mod entity;
pub mod net;
pub mod simulation;
pub mod spatial;
pub mod world;

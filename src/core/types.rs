//! Core type definitions used throughout the codebase

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Unique identifier for actors
///
/// Assigned by the world from the lowest free integer, so ids are reused
/// after an actor is deregistered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[display(fmt = "actor#{}", _0)]
#[serde(transparent)]
pub struct ActorId(pub u32);

/// Unique identifier for areas
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[display(fmt = "area#{}", _0)]
#[serde(transparent)]
pub struct AreaId(pub u32);

/// Unique identifier for structures
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[display(fmt = "structure#{}", _0)]
#[serde(transparent)]
pub struct StructureId(pub u32);

/// Simulation tick counter
pub type Tick = u64;

//! Type definitions for tiles, actors and structures.
//!
//! These are the stat tables the simulation consults: how fast each actor
//! type moves over each kind of terrain, how hard it hits, and what a
//! structure does when touched. They deserialize straight from the TOML type
//! tables loaded by [`TypeRegistry`](super::TypeRegistry).

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::AreaId;
use crate::spatial::Position;

/// How an actor moves over a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Ground,
    Water,
    Air,
}

impl MovementKind {
    pub const ALL: [MovementKind; 3] = [MovementKind::Ground, MovementKind::Water, MovementKind::Air];
}

/// Terrain definition
#[derive(Debug, Clone, Deserialize)]
pub struct TileType {
    pub name: String,
    /// Character used for this tile in area rows
    #[serde(default)]
    pub glyph: Option<char>,
    /// Solid tiles are never entered and are skipped by pathfinding
    #[serde(default)]
    pub solid: bool,
    /// Speed multiplier per movement kind; a missing kind means 0 (impassable)
    #[serde(default)]
    pub speed: AHashMap<MovementKind, f64>,
}

impl TileType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            glyph: None,
            solid: false,
            speed: AHashMap::new(),
        }
    }

    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = Some(glyph);
        self
    }

    pub fn with_speed(mut self, kind: MovementKind, multiplier: f64) -> Self {
        self.speed.insert(kind, multiplier);
        self
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    pub fn speed_multiplier(&self, kind: MovementKind) -> f64 {
        self.speed.get(&kind).copied().unwrap_or(0.0)
    }
}

/// Actor (entity) definition
#[derive(Debug, Clone, Deserialize)]
pub struct ActorType {
    pub name: String,
    pub hit_points: f64,
    #[serde(default)]
    pub damage: f64,
    /// Attacks completed per second
    #[serde(default)]
    pub attack_speed: f64,
    /// Base tiles per second per movement kind
    #[serde(default)]
    pub speed: AHashMap<MovementKind, f64>,
}

impl ActorType {
    pub fn new(name: impl Into<String>, hit_points: f64) -> Self {
        Self {
            name: name.into(),
            hit_points,
            damage: 0.0,
            attack_speed: 0.0,
            speed: AHashMap::new(),
        }
    }

    pub fn with_attack(mut self, damage: f64, attack_speed: f64) -> Self {
        self.damage = damage;
        self.attack_speed = attack_speed;
        self
    }

    pub fn with_speed(mut self, kind: MovementKind, speed: f64) -> Self {
        self.speed.insert(kind, speed);
        self
    }

    pub fn base_speed(&self, kind: MovementKind) -> f64 {
        self.speed.get(&kind).copied().unwrap_or(0.0)
    }

    /// Best speed over a tile across the movement kinds both support
    pub fn speed_over(&self, tile: &TileType) -> f64 {
        MovementKind::ALL
            .iter()
            .map(|&kind| self.base_speed(kind) * tile.speed_multiplier(kind))
            .fold(0.0, f64::max)
    }
}

/// What interacting with a structure does
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureKind {
    /// Reaching it wins the game
    Goal,
    /// Heals the interactor and is consumed
    PowerUp { heal: f64 },
    /// Moves the interactor to another location
    Portal { area: AreaId, position: Position },
    /// No interaction effect
    Decoration,
}

/// Structure definition
#[derive(Debug, Clone, Deserialize)]
pub struct StructureType {
    pub name: String,
    /// Seconds an interaction takes; `Some(0.0)` is instant, `None` means the
    /// structure cannot be interacted with
    #[serde(default)]
    pub interact_duration: Option<f64>,
    #[serde(flatten)]
    pub kind: StructureKind,
}

impl StructureType {
    pub fn new(name: impl Into<String>, kind: StructureKind) -> Self {
        Self {
            name: name.into(),
            interact_duration: None,
            kind,
        }
    }

    pub fn with_interact_duration(mut self, seconds: f64) -> Self {
        self.interact_duration = Some(seconds);
        self
    }

    /// Interactions completed per second; infinite for instant interactions,
    /// zero when the structure cannot be interacted with
    pub fn interact_rate(&self) -> f64 {
        match self.interact_duration {
            Some(d) if d > 0.0 => 1.0 / d,
            Some(_) => f64::INFINITY,
            None => 0.0,
        }
    }
}

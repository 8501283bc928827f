//! Wire messages exchanged between the world host and its observers
//!
//! Encoded as JSON objects with a `type` tag. Optional perception fields are
//! omitted when empty, so a quiet tick costs almost nothing on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, AreaId, StructureId};
use crate::entity::{Action, Actor, Intent};
use crate::spatial::{Position, Tile};
use crate::world::{Structure, World};

/// Server to observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The actor this observer controls
    Identity { id: ActorId },
    Perception(PerceptionMessage),
}

/// Observer to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    Intent { intent: IntentRequest },
}

/// A goal as submitted by an observer, before it is checked against the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntentRequest {
    Move { target: [i32; 2] },
    Attack { target: u32 },
    Interact { target: u32 },
    #[serde(other)]
    Unknown,
}

impl IntentRequest {
    /// Resolve against the world for `actor`
    ///
    /// Returns `None` for unknown intent types, missing targets, and move
    /// targets that are not a tile of the actor's area.
    pub fn resolve(&self, actor: ActorId, world: &World) -> Option<Intent> {
        match *self {
            IntentRequest::Move { target: [x, y] } => {
                let here = world.actor(actor)?.location()?;
                let target = Position::new(x, y);
                world.area(here.area)?.tile(&target)?;
                Some(Intent::move_to(target))
            }
            IntentRequest::Attack { target } => {
                let target = ActorId(target);
                world.actor(target)?;
                Some(Intent::attack(target))
            }
            IntentRequest::Interact { target } => {
                let target = StructureId(target);
                world.structure(target)?;
                Some(Intent::interact(target))
            }
            IntentRequest::Unknown => None,
        }
    }
}

impl From<Intent> for IntentRequest {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Move { target } => IntentRequest::Move {
                target: [target.x, target.y],
            },
            Intent::Attack { target } => IntentRequest::Attack { target: target.0 },
            Intent::Interact { target } => IntentRequest::Interact { target: target.0 },
        }
    }
}

/// A perception diff as sent on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceptionMessage {
    /// Present only when the observer entered a new area; the rest of the
    /// message is then a full snapshot of it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaId>,
    /// Keyed by encoded position ("x,y")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiles: Option<BTreeMap<String, TileView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<EntityView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structures: Option<Vec<StructureView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_ups: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    #[serde(rename = "type")]
    pub tile_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<ActorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructureId>,
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        Self {
            tile_type: tile.tile_type.name.clone(),
            entity: tile.occupant(),
            structure: tile.structure(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityView {
    pub id: ActorId,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub hit_points: f64,
    pub max_hit_points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionView>,
}

impl From<&Actor> for EntityView {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            entity_type: actor.actor_type.name.clone(),
            hit_points: actor.hit_points(),
            max_hit_points: actor.max_hit_points(),
            action: actor.action().map(ActionView::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionView {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    pub progress: f64,
}

impl From<&Action> for ActionView {
    fn from(action: &Action) -> Self {
        Self {
            action_type: action.kind.name().to_string(),
            direction: action.direction.map(|d| d.code().to_string()),
            progress: action.progress(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureView {
    pub id: StructureId,
    #[serde(rename = "type")]
    pub structure_type: String,
}

impl From<&Structure> for StructureView {
    fn from(structure: &Structure) -> Self {
        Self {
            id: structure.id,
            structure_type: structure.structure_type.name.clone(),
        }
    }
}

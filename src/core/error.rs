use thiserror::Error;

use crate::core::types::{ActorId, AreaId, StructureId};
use crate::spatial::Position;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Area not found: {0}")]
    AreaNotFound(AreaId),

    #[error("Structure not found: {0}")]
    StructureNotFound(StructureId),

    #[error("Unknown {kind} type: {name}")]
    UnknownType { kind: &'static str, name: String },

    #[error("No tile at {position} in {area}")]
    TileNotFound { area: AreaId, position: Position },

    #[error("Tile {position} in {area} is already occupied")]
    TileOccupied { area: AreaId, position: Position },

    #[error("No free spawn point")]
    NoSpawnPoint,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading configuration, type tables or scenarios
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, WorldError>;

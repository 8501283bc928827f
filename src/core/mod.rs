pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{ConfigError, Result, WorldError};
pub use types::{ActorId, AreaId, StructureId, Tick};

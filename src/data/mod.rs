//! Type definitions and the registry that resolves them by name

pub mod registry;
pub mod scenario;
pub mod schema;

pub use registry::TypeRegistry;
pub use scenario::Scenario;
pub use schema::{ActorType, MovementKind, StructureKind, StructureType, TileType};

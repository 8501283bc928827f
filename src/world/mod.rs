//! The world: areas, actors and structures under one owner

pub mod objects;
pub mod structure;
#[allow(clippy::module_inception)]
pub mod world;

pub use objects::WorldObjects;
pub use structure::Structure;
pub use world::World;

//! Spatial model: positions, tiles, areas and grid pathfinding

pub mod area;
pub mod pathfinding;
pub mod position;
pub mod tile;

pub use area::Area;
pub use pathfinding::{find_path, path_length, PathCache};
pub use position::{Direction, Location, Position};
pub use tile::Tile;

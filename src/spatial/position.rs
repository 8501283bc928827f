//! Integer grid positions and the eight neighbour directions
//!
//! Positions are plain values: equality and hashing depend only on the
//! coordinates, so two positions built from the same (x, y) are the same key
//! everywhere. The canonical string form `"x,y"` is what crosses the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::AreaId;

/// Integer grid coordinate (y grows southwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canonical `"x,y"` encoding
    pub fn encode(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Inverse of [`Position::encode`]
    pub fn decode(encoded: &str) -> Option<Self> {
        let (x, y) = encoded.split_once(',')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }

    /// Euclidean distance between tile centres
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// All eight neighbours in [`Direction::ALL`] order
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, Position)> + '_ {
        Direction::ALL.iter().map(move |&d| (d, self.neighbor(d)))
    }

    /// The neighbour direction whose path through that neighbour to `target`
    /// is shortest
    ///
    /// Ties go to the earliest direction in [`Direction::ALL`]. Returns `None`
    /// when already at `target`.
    pub fn direction_to(&self, target: &Self) -> Option<Direction> {
        if self == target {
            return None;
        }

        let mut best: Option<(Direction, f64)> = None;
        for (direction, neighbor) in self.neighbors() {
            let through = self.distance(&neighbor) + neighbor.distance(target);
            match best {
                Some((_, cost)) if cost <= through => {}
                _ => best = Some((direction, through)),
            }
        }
        best.map(|(direction, _)| direction)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A position inside a specific area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub area: AreaId,
    pub position: Position,
}

impl Location {
    pub fn new(area: AreaId, position: Position) -> Self {
        Self { area, position }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.area, self.position)
    }
}

/// One of the eight grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Enumeration order, also used for tie-breaking
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Unit offset (dx, dy)
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    /// Short wire name ("N", "NE", ...)
    pub fn code(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }
}

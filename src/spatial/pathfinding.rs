//! A* pathfinding over an area's tiles
//!
//! Edge cost and heuristic are both Euclidean, so diagonal steps cost sqrt(2)
//! and the heuristic stays admissible. Only solidity blocks a tile; occupancy
//! is left to the Move action's own legality check.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::AreaId;
use crate::spatial::area::Area;
use crate::spatial::position::Position;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    position: Position,
    f_cost: OrderedFloat<f64>, // g_cost + heuristic
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.position == other.position
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; position breaks ties deterministically
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find path using A*
///
/// Returns every position from `start` to `goal` inclusive, or `None` if the
/// goal cannot be reached.
pub fn find_path(area: &Area, start: Position, goal: Position) -> Option<Vec<Position>> {
    if start == goal {
        return Some(vec![start]);
    }
    if !area.is_walkable(&goal) {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Position, Position> = AHashMap::new();
    let mut g_scores: AHashMap<Position, f64> = AHashMap::new();

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        position: start,
        f_cost: OrderedFloat(start.distance(&goal)),
    });

    while let Some(current) = open_set.pop() {
        if current.position == goal {
            return Some(reconstruct_path(&came_from, current.position));
        }

        let current_g = *g_scores.get(&current.position).unwrap_or(&f64::INFINITY);

        for (_, neighbor) in current.position.neighbors() {
            if !area.is_walkable(&neighbor) {
                continue;
            }

            let tentative_g = current_g + current.position.distance(&neighbor);
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&f64::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.position);
                g_scores.insert(neighbor, tentative_g);

                open_set.push(PathNode {
                    position: neighbor,
                    f_cost: OrderedFloat(tentative_g + neighbor.distance(&goal)),
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &AHashMap<Position, Position>,
    mut current: Position,
) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Total Euclidean length of a path
pub fn path_length(path: &[Position]) -> f64 {
    path.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Memoized pathfinding keyed by area and coordinates
///
/// Whoever changes tile solidity or replaces an area must call
/// [`PathCache::invalidate`]. Once `capacity` entries are stored the cache
/// is emptied before the next insert.
#[derive(Debug)]
pub struct PathCache {
    entries: AHashMap<(AreaId, Position, Position), Option<Vec<Position>>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: AHashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn find_path(&mut self, area: &Area, start: Position, goal: Position) -> Option<Vec<Position>> {
        let key = (area.id, start, goal);
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;
        let path = find_path(area, start, goal);
        if self.entries.len() >= self.capacity {
            tracing::trace!("Path cache full at {} entries, clearing", self.entries.len());
            self.entries.clear();
        }
        self.entries.insert(key, path.clone());
        path
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MovementKind, TileType, TypeRegistry};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register_tile(
                TileType::new("grass")
                    .with_glyph('.')
                    .with_speed(MovementKind::Ground, 1.0),
            )
            .unwrap();
        registry
            .register_tile(TileType::new("wall").with_glyph('#').solid())
            .unwrap();
        registry
    }

    fn area(rows: &[&str]) -> Area {
        Area::from_rows(AreaId(0), rows, &registry()).unwrap()
    }

    #[test]
    fn test_pathfind_straight_line() {
        let area = area(&["......"]);
        let start = Position::new(0, 0);
        let goal = Position::new(5, 0);

        let path = find_path(&area, start, goal).unwrap();

        assert_eq!(path.len(), 6);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn test_pathfind_prefers_diagonal() {
        let area = area(&["...", "...", "..."]);
        let path = find_path(&area, Position::new(0, 0), Position::new(2, 2)).unwrap();
        assert_eq!(
            path,
            vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]
        );
    }

    #[test]
    fn test_pathfind_around_obstacle() {
        let area = area(&[
            ".....",
            ".###.",
            ".....",
        ]);
        let start = Position::new(2, 0);
        let goal = Position::new(2, 2);

        let path = find_path(&area, start, goal).unwrap();

        assert!(!path.contains(&Position::new(2, 1)));
        assert_eq!(path.last(), Some(&goal));
        // Each step is to a neighbour
        for pair in path.windows(2) {
            assert!(pair[0].distance(&pair[1]) < 1.5);
        }
    }

    #[test]
    fn test_pathfind_no_path() {
        let area = area(&[
            ".#.",
            "##.",
            "...",
        ]);
        assert!(find_path(&area, Position::new(2, 2), Position::new(0, 0)).is_none());
    }

    #[test]
    fn test_pathfind_goal_missing_or_solid() {
        let area = area(&["..#"]);
        assert!(find_path(&area, Position::new(0, 0), Position::new(2, 0)).is_none());
        assert!(find_path(&area, Position::new(0, 0), Position::new(9, 9)).is_none());
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let area = area(&["..."]);
        let start = Position::new(1, 0);

        let path = find_path(&area, start, start).unwrap();

        assert_eq!(path, vec![start]);
    }

    #[test]
    fn test_path_length() {
        let path = vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 1)];
        let length = path_length(&path);
        assert!((length - (1.0 + std::f64::consts::SQRT_2)).abs() < 1e-12);
    }

    #[test]
    fn test_cache_hits_on_equal_coordinates() {
        let area = area(&["....."]);
        let mut cache = PathCache::new();

        let first = cache.find_path(&area, Position::new(0, 0), Position::new(4, 0));
        // Freshly built positions with the same coordinates hit the cache
        let second = cache.find_path(&area, Position::new(0, 0), Position::new(4, 0));

        assert_eq!(first, second);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_cache_invalidate() {
        let area = area(&["..."]);
        let mut cache = PathCache::new();
        cache.find_path(&area, Position::new(0, 0), Position::new(2, 0));
        assert_eq!(cache.len(), 1);

        cache.invalidate();

        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_stays_within_capacity() {
        let area = area(&["....."]);
        let mut cache = PathCache::with_capacity(2);
        for goal in 1..5 {
            cache.find_path(&area, Position::new(0, 0), Position::new(goal, 0));
            assert!(cache.len() <= 2);
        }
        assert_eq!(cache.stats(), (0, 4));
    }
}

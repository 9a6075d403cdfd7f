mod arena;
mod wall;

pub use arena::Arena;
pub use wall::Wall;

use glam::Vec2;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("wall map must contain at least one wall")]
    Empty,
}

/// Ordered, never-empty set of walls. The first four entries conventionally
/// form the closed outer boundary.
#[derive(Debug, Clone)]
pub struct WallMap {
    walls: Vec<Wall>,
    spawn_points: Vec<Vec2>,
}

impl WallMap {
    pub fn new(walls: Vec<Wall>) -> Result<Self, MapError> {
        Self::with_spawn_points(walls, Vec::new())
    }

    pub fn with_spawn_points(walls: Vec<Wall>, spawn_points: Vec<Vec2>) -> Result<Self, MapError> {
        if walls.is_empty() {
            return Err(MapError::Empty);
        }
        Ok(Self::from_parts(walls, spawn_points))
    }

    pub fn from_tuples(tuples: &[(f32, f32, f32, f32)]) -> Result<Self, MapError> {
        Self::new(tuples.iter().copied().map(Wall::from).collect())
    }

    pub(crate) fn from_parts(walls: Vec<Wall>, spawn_points: Vec<Vec2>) -> Self {
        debug_assert!(!walls.is_empty());
        Self {
            walls,
            spawn_points,
        }
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn spawn_points(&self) -> &[Vec2] {
        &self.spawn_points
    }

    /// Spawn point for a round, cycling through the list. Falls back to the
    /// map origin offset by one unit when the map has none.
    pub fn spawn_point(&self, round: usize) -> Vec2 {
        if self.spawn_points.is_empty() {
            return Vec2::ONE;
        }
        self.spawn_points[round % self.spawn_points.len()]
    }

    pub fn collides(&self, center: Vec2, radius: f32) -> bool {
        self.walls.iter().any(|w| w.intersects_circle(center, radius))
    }
}

impl Default for WallMap {
    fn default() -> Self {
        Arena::map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_is_rejected() {
        assert!(matches!(WallMap::new(Vec::new()), Err(MapError::Empty)));
    }

    #[test]
    fn map_from_tuples_keeps_order() {
        let map = WallMap::from_tuples(&[(0.0, 0.0, 1.0, 0.0), (8.0, 5.0, 8.0, 8.0)]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.walls()[1].as_tuple(), (8.0, 5.0, 8.0, 8.0));
        assert_eq!(map.spawn_point(3), Vec2::ONE);
    }

    #[test]
    fn spawn_points_cycle_by_round() {
        let map = Arena::map();
        assert_eq!(map.spawn_point(0), map.spawn_point(4));
        assert_ne!(map.spawn_point(0), map.spawn_point(1));
    }
}

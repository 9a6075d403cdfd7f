use glam::Vec2;

use super::{Wall, WallMap};

/// The 20x20 default arena: outer boundary, two corner brackets and a
/// hollow center block.
pub struct Arena;

impl Arena {
    pub const SIZE: f32 = 20.0;

    pub fn walls() -> Vec<Wall> {
        let mut walls = Vec::new();
        Self::add_boundary(&mut walls);
        Self::add_obstacles(&mut walls);
        Self::add_center_structure(&mut walls);
        walls
    }

    pub fn spawn_points() -> Vec<Vec2> {
        vec![
            Vec2::new(3.0, 3.0),
            Vec2::new(17.0, 17.0),
            Vec2::new(3.0, 17.0),
            Vec2::new(17.0, 3.0),
        ]
    }

    pub fn map() -> WallMap {
        WallMap::from_parts(Self::walls(), Self::spawn_points())
    }

    fn add_boundary(walls: &mut Vec<Wall>) {
        let size = Self::SIZE;
        walls.push(Wall::new(0.0, 0.0, size, 0.0));
        walls.push(Wall::new(0.0, 0.0, 0.0, size));
        walls.push(Wall::new(size, 0.0, size, size));
        walls.push(Wall::new(0.0, size, size, size));
    }

    fn add_obstacles(walls: &mut Vec<Wall>) {
        walls.push(Wall::new(5.0, 5.0, 8.0, 5.0));
        walls.push(Wall::new(5.0, 5.0, 5.0, 8.0));
        walls.push(Wall::new(12.0, 12.0, 15.0, 12.0));
        walls.push(Wall::new(12.0, 12.0, 12.0, 15.0));
    }

    fn add_center_structure(walls: &mut Vec<Wall>) {
        walls.push(Wall::new(8.0, 8.0, 12.0, 8.0));
        walls.push(Wall::new(8.0, 8.0, 8.0, 12.0));
        walls.push(Wall::new(12.0, 8.0, 12.0, 12.0));
        walls.push(Wall::new(8.0, 12.0, 12.0, 12.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_starts_with_closed_boundary() {
        let map = Arena::map();
        assert_eq!(map.len(), 12);

        let boundary = &map.walls()[..4];
        assert!(boundary.iter().all(|w| (w.length() - Arena::SIZE).abs() < 1e-6));
        assert_eq!(map.spawn_points().len(), 4);
    }

    #[test]
    fn spawn_points_are_clear_of_walls() {
        let map = Arena::map();
        for spawn in map.spawn_points() {
            assert!(!map.collides(*spawn, 0.5), "spawn {spawn} overlaps a wall");
        }
    }
}
